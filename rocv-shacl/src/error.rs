//! SHACL error types

use thiserror::Error;

/// Result type for SHACL operations
pub type Result<T> = std::result::Result<T, ShaclError>;

/// SHACL compilation errors
///
/// Validation itself never errors: failed constraints become report
/// entries. Errors here mean the shapes graph could not be turned into an
/// executable form.
#[derive(Debug, Error, Clone)]
pub enum ShaclError {
    /// Shape compilation error
    #[error("Failed to compile shape {shape}: {message}")]
    CompilationError { shape: String, message: String },

    /// Invalid constraint specification
    #[error("Invalid constraint on shape {shape}: {message}")]
    InvalidConstraint { shape: String, message: String },

    /// Invalid regex pattern in sh:pattern
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The shape uses a SHACL feature this engine does not implement
    #[error("Shape {shape} uses unsupported SHACL feature {feature}")]
    UnsupportedFeature { shape: String, feature: String },
}

//! Engine error types
//!
//! Loader and profile errors abort a run with no `ValidationResult`.
//! Execution-time failures (programmatic check errors, SHACL engine
//! failures, unknown shapes) are surfaced as issues instead and never
//! appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving and reading a crate
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The crate URI does not point at anything readable
    #[error("RO-Crate not found: {uri}")]
    CrateNotFound { uri: String },

    /// The crate has no ro-crate-metadata.json at its root
    #[error("ro-crate-metadata.json not found in crate: {uri}")]
    MetadataMissing { uri: String },

    /// The metadata document failed JSON or JSON-LD parsing
    #[error("Invalid ro-crate-metadata.json in {uri}: {message}")]
    MetadataMalformed { uri: String, message: String },

    /// The URI scheme is not one the loader supports
    #[error("Unsupported crate URI scheme: {uri}")]
    UnsupportedScheme { uri: String },

    /// A remote crate could not be downloaded
    #[error("Network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The crate archive could not be read
    #[error("Corrupt crate archive {path}: {message}")]
    ArchiveCorrupt { path: PathBuf, message: String },
}

/// Errors raised while loading or resolving profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile with the requested identifier is registered
    #[error("Profile not found: {identifier}")]
    ProfileNotFound { identifier: String },

    /// The profile directory or its descriptor could not be parsed
    #[error("Malformed profile at {path}: {message}")]
    ProfileMalformed { path: PathBuf, message: String },

    /// The isProfileOf graph contains a cycle
    #[error("Profile inheritance cycle involving {identifier}")]
    ProfileCycle { identifier: String },

    /// Two registered profiles share an identifier or URI
    #[error("Duplicate profile {what}: {value}")]
    DuplicateIdentifier { what: &'static str, value: String },

    /// The profiles directory does not exist
    #[error("Profiles directory not found: {path}")]
    ProfilesDirectoryNotFound { path: PathBuf },
}

/// Top-level engine error: everything that can abort a validation run
#[derive(Debug, Error)]
pub enum EngineError {
    /// Crate loading failed
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Profile loading or selection failed
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

//! Graph parsing error types

use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while building graphs from JSON-LD or Turtle
#[derive(Debug, Error, Clone)]
pub enum GraphError {
    /// The document is not JSON-LD the parser understands
    #[error("Invalid JSON-LD: {message}")]
    InvalidJsonLd { message: String },

    /// Turtle syntax error with source location
    #[error("Turtle syntax error at line {line}: {message}")]
    TurtleSyntax { line: usize, message: String },

    /// A prefixed name used an undeclared prefix
    #[error("Undeclared prefix '{prefix}' at line {line}")]
    UndeclaredPrefix { prefix: String, line: usize },

    /// An IRI could not be resolved
    #[error("Invalid IRI: {iri}")]
    InvalidIri { iri: String },
}

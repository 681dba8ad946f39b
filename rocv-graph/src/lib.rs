//! RDF graph model for the RO-Crate validator
//!
//! This crate provides:
//! - The term/triple/graph IR shared by every layer of the validator
//! - JSON-LD flattening for `ro-crate-metadata.json` documents
//! - A Turtle parser for profile descriptors and SHACL shape files
//!
//! # Example
//!
//! ```
//! use rocv_graph::{turtle, Term};
//!
//! let graph = turtle::parse(
//!     "@prefix ex: <http://example.org/> . ex:s ex:p \"hello\" .",
//!     None,
//! ).unwrap();
//!
//! let s = Term::iri("http://example.org/s");
//! assert_eq!(
//!     graph.value(&s, "http://example.org/p"),
//!     Some(&Term::string("hello"))
//! );
//! ```

pub mod error;
pub mod graph;
pub mod jsonld;
pub mod term;
pub mod triple;
pub mod turtle;

pub use error::{GraphError, Result};
pub use graph::Graph;
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;

/// The local name of an IRI: the text after the last `#` or `/`
///
/// Used to derive requirement and check identifiers from shape IRIs.
pub fn local_name(iri: &str) -> &str {
    match iri.rsplit_once('#') {
        Some((_, local)) if !local.is_empty() => local,
        _ => match iri.trim_end_matches('/').rsplit_once('/') {
            Some((_, local)) if !local.is_empty() => local,
            _ => iri,
        },
    }
}

//! SHACL shape compilation and validation for the RO-Crate validator
//!
//! This crate turns a Turtle-parsed shapes graph into compiled shapes and
//! validates data graphs against them. It implements the SHACL subset the
//! built-in RO-Crate profiles use; shapes that rely on features outside the
//! subset are rejected at compile time so the caller can surface a single
//! engine error for that profile instead of silently skipping constraints.
//!
//! # Example
//!
//! ```
//! use rocv_graph::turtle;
//! use rocv_shacl::ShaclEngine;
//!
//! let shapes = turtle::parse(r#"
//!     @prefix sh: <http://www.w3.org/ns/shacl#> .
//!     @prefix schema: <http://schema.org/> .
//!     <http://example.org/S> a sh:NodeShape ;
//!         sh:targetClass schema:Dataset ;
//!         sh:property [ sh:path schema:name ; sh:minCount 1 ] .
//! "#, None).unwrap();
//!
//! let engine = ShaclEngine::compile(&shapes).unwrap();
//! let report = engine.validate(&turtle::parse(r#"
//!     @prefix schema: <http://schema.org/> .
//!     <http://x/> a schema:Dataset .
//! "#, None).unwrap());
//! assert!(!report.conforms);
//! ```

pub mod compile;
pub mod constraints;
pub mod error;
pub mod validate;

pub use compile::{CompiledShape, PropertyShape, Severity, ShapeId, Target};
pub use constraints::{Constraint, ConstraintViolation, NodeKind};
pub use error::{Result, ShaclError};
pub use validate::{ReportEntry, ShaclEngine, ValidationReport};

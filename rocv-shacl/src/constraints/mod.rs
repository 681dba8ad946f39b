//! SHACL constraint types and validators
//!
//! This module defines the constraint types supported by the engine and
//! provides validation logic for each constraint family.

pub mod cardinality;
pub mod datatype;
pub mod pattern;
pub mod value;

use regex::Regex;
use rocv_graph::Term;
use std::sync::Arc;

/// A SHACL constraint that can be validated against values
#[derive(Debug, Clone)]
pub enum Constraint {
    // Cardinality constraints
    /// sh:minCount - minimum number of values
    MinCount(usize),
    /// sh:maxCount - maximum number of values
    MaxCount(usize),

    // Value type constraints
    /// sh:datatype - literal values must have this datatype IRI
    Datatype(String),
    /// sh:nodeKind - values must be of this node kind
    NodeKind(NodeKind),
    /// sh:class - values must be instances of this class IRI
    Class(String),

    // Value constraints
    /// sh:hasValue - the value set must contain this value
    HasValue(Term),
    /// sh:in - each value must be in this list
    In(Vec<Term>),

    // String constraints
    /// sh:pattern (flags already folded into the compiled regex)
    Pattern {
        /// Compiled regex
        regex: Arc<Regex>,
        /// Original pattern source, for messages
        source: String,
    },
    /// sh:minLength - minimum string length
    MinLength(usize),
    /// sh:maxLength - maximum string length
    MaxLength(usize),
}

impl Constraint {
    /// The SHACL constraint component name, used in report entries
    pub fn component(&self) -> &'static str {
        match self {
            Constraint::MinCount(_) => "sh:MinCountConstraintComponent",
            Constraint::MaxCount(_) => "sh:MaxCountConstraintComponent",
            Constraint::Datatype(_) => "sh:DatatypeConstraintComponent",
            Constraint::NodeKind(_) => "sh:NodeKindConstraintComponent",
            Constraint::Class(_) => "sh:ClassConstraintComponent",
            Constraint::HasValue(_) => "sh:HasValueConstraintComponent",
            Constraint::In(_) => "sh:InConstraintComponent",
            Constraint::Pattern { .. } => "sh:PatternConstraintComponent",
            Constraint::MinLength(_) => "sh:MinLengthConstraintComponent",
            Constraint::MaxLength(_) => "sh:MaxLengthConstraintComponent",
        }
    }

    /// A human-readable description of this constraint
    pub fn description(&self) -> String {
        match self {
            Constraint::MinCount(n) => format!("sh:minCount {}", n),
            Constraint::MaxCount(n) => format!("sh:maxCount {}", n),
            Constraint::Datatype(dt) => format!("sh:datatype <{}>", dt),
            Constraint::NodeKind(kind) => format!("sh:nodeKind {}", kind.name()),
            Constraint::Class(class) => format!("sh:class <{}>", class),
            Constraint::HasValue(v) => format!("sh:hasValue {}", v),
            Constraint::In(vs) => format!("sh:in ({} values)", vs.len()),
            Constraint::Pattern { source, .. } => format!("sh:pattern \"{}\"", source),
            Constraint::MinLength(n) => format!("sh:minLength {}", n),
            Constraint::MaxLength(n) => format!("sh:maxLength {}", n),
        }
    }
}

/// sh:nodeKind values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// sh:IRI
    Iri,
    /// sh:BlankNode
    BlankNode,
    /// sh:Literal
    Literal,
    /// sh:IRIOrLiteral
    IriOrLiteral,
    /// sh:BlankNodeOrIRI
    BlankNodeOrIri,
}

impl NodeKind {
    /// The SHACL term name for messages
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Iri => "sh:IRI",
            NodeKind::BlankNode => "sh:BlankNode",
            NodeKind::Literal => "sh:Literal",
            NodeKind::IriOrLiteral => "sh:IRIOrLiteral",
            NodeKind::BlankNodeOrIri => "sh:BlankNodeOrIRI",
        }
    }
}

/// Result of a failed constraint evaluation
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// The constraint component that was violated
    pub component: &'static str,
    /// The value that violated the constraint (absent for cardinality)
    pub value: Option<Term>,
    /// Human-readable message about the violation
    pub message: String,
}

impl ConstraintViolation {
    /// Create a violation with no offending value (cardinality failures)
    pub fn of(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            component,
            value: None,
            message: message.into(),
        }
    }

    /// Create a violation carrying the offending value
    pub fn with_value(
        component: &'static str,
        value: &Term,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component,
            value: Some(value.clone()),
            message: message.into(),
        }
    }
}

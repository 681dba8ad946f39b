//! Shape compilation from a shapes graph
//!
//! This module compiles SHACL shape definitions out of a parsed Turtle
//! graph into `CompiledShape` structures the validation engine executes.

use crate::constraints::{Constraint, NodeKind};
use crate::error::{Result, ShaclError};
use regex::Regex;
use rocv_graph::{local_name, Graph, Term};
use rocv_vocab::{rdfs, sh};
use std::sync::Arc;
use tracing::debug;

/// Unique identifier for a shape
pub type ShapeId = Term;

/// How a shape selects its target focus nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// sh:targetClass - all instances of the class
    Class(String),
    /// sh:targetNode - a specific node
    Node(Term),
    /// sh:targetSubjectsOf - subjects of triples with this predicate
    SubjectsOf(String),
    /// sh:targetObjectsOf - objects of triples with this predicate
    ObjectsOf(String),
}

/// Severity level for constraint violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// sh:Violation
    #[default]
    Violation,
    /// sh:Warning
    Warning,
    /// sh:Info
    Info,
}

/// A compiled property shape
#[derive(Debug, Clone)]
pub struct PropertyShape {
    /// The shape ID (blank node or IRI as written, possibly rewritten by
    /// the profile registry to a stable IRI)
    pub id: ShapeId,
    /// The property path (a single predicate IRI)
    pub path: String,
    /// Constraints on this property's values
    pub constraints: Vec<Constraint>,
    /// sh:or alternatives, each a constraint set evaluated per value
    pub or_alternatives: Vec<Vec<Constraint>>,
    /// Severity level for violations
    pub severity: Option<Severity>,
    /// Human-readable name (sh:name)
    pub name: Option<String>,
    /// Human-readable description (sh:description)
    pub description: Option<String>,
    /// Message template for violations (sh:message)
    pub message: Option<String>,
}

/// A compiled node shape
#[derive(Debug, Clone)]
pub struct CompiledShape {
    /// The shape ID
    pub id: ShapeId,
    /// Local name of the shape IRI (requirement identifier source)
    pub name: String,
    /// Human-readable label (sh:name or rdfs:label)
    pub label: Option<String>,
    /// Human-readable description (sh:description or rdfs:comment)
    pub description: Option<String>,
    /// How this shape targets focus nodes
    pub targets: Vec<Target>,
    /// Property shapes (constraints on specific properties)
    pub property_shapes: Vec<PropertyShape>,
    /// Constraints directly on the focus node
    pub node_constraints: Vec<Constraint>,
    /// Severity level for violations
    pub severity: Severity,
    /// Message template for violations (sh:message)
    pub message: Option<String>,
    /// Whether this shape is deactivated (sh:deactivated true)
    pub deactivated: bool,
}

/// Compile every shape in a shapes graph
///
/// Shapes are subjects typed `sh:NodeShape`; standalone `sh:PropertyShape`
/// subjects (not nested under a node shape) are wrapped in a synthetic node
/// shape so they surface as requirements of their own.
pub fn compile(graph: &Graph) -> Result<Vec<CompiledShape>> {
    let mut shapes = Vec::new();

    let node_shape_subjects = graph.subjects_of_type(sh::NODE_SHAPE);
    for subject in &node_shape_subjects {
        shapes.push(compile_node_shape(graph, *subject)?);
    }

    // Standalone property shapes: typed sh:PropertyShape and not referenced
    // through any sh:property link.
    for subject in graph.subjects_of_type(sh::PROPERTY_SHAPE) {
        let nested = graph
            .subjects()
            .iter()
            .any(|s| graph.objects(*s, sh::PROPERTY).any(|o| o == subject));
        if nested || node_shape_subjects.contains(&subject) {
            continue;
        }
        let property = compile_property_shape(graph, subject)?;
        shapes.push(CompiledShape {
            id: subject.clone(),
            name: shape_name(subject),
            label: property.name.clone(),
            description: property.description.clone(),
            targets: compile_targets(graph, subject),
            property_shapes: vec![property],
            node_constraints: Vec::new(),
            severity: parse_severity(graph, subject).unwrap_or_default(),
            message: literal_value(graph, subject, sh::MESSAGE),
            deactivated: false,
        });
    }

    // Deterministic order regardless of file layout
    shapes.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(count = shapes.len(), "compiled shapes");
    Ok(shapes)
}

fn compile_node_shape(graph: &Graph, subject: &Term) -> Result<CompiledShape> {
    reject_unsupported(graph, subject)?;

    let mut property_shapes = Vec::new();
    for prop in graph.objects(subject, sh::PROPERTY) {
        reject_unsupported(graph, prop)?;
        property_shapes.push(compile_property_shape(graph, prop)?);
    }
    // Stable check order within the requirement
    property_shapes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.id.cmp(&b.id)));

    Ok(CompiledShape {
        id: (*subject).clone(),
        name: shape_name(subject),
        label: literal_value(graph, subject, sh::NAME)
            .or_else(|| literal_value(graph, subject, rdfs::LABEL)),
        description: literal_value(graph, subject, sh::DESCRIPTION)
            .or_else(|| literal_value(graph, subject, rdfs::COMMENT)),
        targets: compile_targets(graph, subject),
        property_shapes,
        node_constraints: compile_constraints(graph, subject)?,
        severity: parse_severity(graph, subject).unwrap_or_default(),
        message: literal_value(graph, subject, sh::MESSAGE),
        deactivated: graph.value(subject, sh::DEACTIVATED)
            == Some(&Term::boolean(true)),
    })
}

fn compile_property_shape(graph: &Graph, subject: &Term) -> Result<PropertyShape> {
    let path = match graph.value(subject, sh::PATH) {
        Some(Term::Iri(iri)) => iri.to_string(),
        Some(other) => {
            // Sequence/alternative/inverse paths arrive as blank nodes
            return Err(ShaclError::UnsupportedFeature {
                shape: subject.lexical(),
                feature: format!("non-predicate sh:path ({})", other),
            });
        }
        None => {
            return Err(ShaclError::CompilationError {
                shape: subject.lexical(),
                message: "property shape has no sh:path".to_string(),
            })
        }
    };

    let mut or_alternatives = Vec::new();
    if let Some(or_head) = graph.value(subject, sh::OR) {
        for alt in graph.rdf_list(or_head) {
            or_alternatives.push(compile_constraints(graph, &alt)?);
        }
        if or_alternatives.is_empty() {
            return Err(ShaclError::InvalidConstraint {
                shape: subject.lexical(),
                message: "sh:or list is empty or malformed".to_string(),
            });
        }
    }

    Ok(PropertyShape {
        id: subject.clone(),
        path,
        constraints: compile_constraints(graph, subject)?,
        or_alternatives,
        severity: parse_severity(graph, subject),
        name: literal_value(graph, subject, sh::NAME),
        description: literal_value(graph, subject, sh::DESCRIPTION),
        message: literal_value(graph, subject, sh::MESSAGE),
    })
}

fn compile_targets(graph: &Graph, subject: &Term) -> Vec<Target> {
    let mut targets = Vec::new();
    for class in graph.objects(subject, sh::TARGET_CLASS) {
        if let Some(iri) = class.as_iri() {
            targets.push(Target::Class(iri.to_string()));
        }
    }
    for node in graph.objects(subject, sh::TARGET_NODE) {
        targets.push(Target::Node(node.clone()));
    }
    for pred in graph.objects(subject, sh::TARGET_SUBJECTS_OF) {
        if let Some(iri) = pred.as_iri() {
            targets.push(Target::SubjectsOf(iri.to_string()));
        }
    }
    for pred in graph.objects(subject, sh::TARGET_OBJECTS_OF) {
        if let Some(iri) = pred.as_iri() {
            targets.push(Target::ObjectsOf(iri.to_string()));
        }
    }
    targets
}

/// Extract the constraint set declared directly on a shape node
fn compile_constraints(graph: &Graph, subject: &Term) -> Result<Vec<Constraint>> {
    let mut constraints = Vec::new();

    if let Some(n) = integer_value(graph, subject, sh::MIN_COUNT) {
        constraints.push(Constraint::MinCount(n));
    }
    if let Some(n) = integer_value(graph, subject, sh::MAX_COUNT) {
        constraints.push(Constraint::MaxCount(n));
    }
    if let Some(Term::Iri(dt)) = graph.value(subject, sh::DATATYPE) {
        constraints.push(Constraint::Datatype(dt.to_string()));
    }
    if let Some(kind) = graph.value(subject, sh::NODE_KIND) {
        constraints.push(Constraint::NodeKind(parse_node_kind(subject, kind)?));
    }
    if let Some(Term::Iri(class)) = graph.value(subject, sh::CLASS) {
        constraints.push(Constraint::Class(class.to_string()));
    }
    if let Some(value) = graph.value(subject, sh::HAS_VALUE) {
        constraints.push(Constraint::HasValue(value.clone()));
    }
    if let Some(head) = graph.value(subject, sh::IN) {
        let values = graph.rdf_list(head);
        if values.is_empty() {
            return Err(ShaclError::InvalidConstraint {
                shape: subject.lexical(),
                message: "sh:in list is empty or malformed".to_string(),
            });
        }
        constraints.push(Constraint::In(values));
    }
    if let Some(pattern) = literal_value(graph, subject, sh::PATTERN) {
        let flags = literal_value(graph, subject, sh::FLAGS);
        constraints.push(compile_pattern(&pattern, flags.as_deref())?);
    }
    if let Some(n) = integer_value(graph, subject, sh::MIN_LENGTH) {
        constraints.push(Constraint::MinLength(n));
    }
    if let Some(n) = integer_value(graph, subject, sh::MAX_LENGTH) {
        constraints.push(Constraint::MaxLength(n));
    }

    Ok(constraints)
}

/// Fold sh:flags into an inline regex flag group and compile
fn compile_pattern(pattern: &str, flags: Option<&str>) -> Result<Constraint> {
    let source = match flags {
        Some(flags) if !flags.is_empty() => {
            let supported: String = flags
                .chars()
                .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'U'))
                .collect();
            format!("(?{}){}", supported, pattern)
        }
        _ => pattern.to_string(),
    };
    let regex = Regex::new(&source).map_err(|e| ShaclError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(Constraint::Pattern {
        regex: Arc::new(regex),
        source: pattern.to_string(),
    })
}

fn parse_node_kind(subject: &Term, kind: &Term) -> Result<NodeKind> {
    match kind.as_iri() {
        Some(sh::IRI) => Ok(NodeKind::Iri),
        Some(sh::BLANK_NODE) => Ok(NodeKind::BlankNode),
        Some(sh::LITERAL) => Ok(NodeKind::Literal),
        Some(sh::IRI_OR_LITERAL) => Ok(NodeKind::IriOrLiteral),
        Some(sh::BLANK_NODE_OR_IRI) => Ok(NodeKind::BlankNodeOrIri),
        _ => Err(ShaclError::InvalidConstraint {
            shape: subject.lexical(),
            message: format!("invalid sh:nodeKind value {}", kind),
        }),
    }
}

/// Parse an sh:severity declaration, if present
fn parse_severity(graph: &Graph, subject: &Term) -> Option<Severity> {
    match graph.value(subject, sh::SEVERITY)?.as_iri() {
        Some(sh::VIOLATION) => Some(Severity::Violation),
        Some(sh::WARNING) => Some(Severity::Warning),
        Some(sh::INFO) => Some(Severity::Info),
        _ => None,
    }
}

/// Features the engine does not execute are compile errors, never ignored
fn reject_unsupported(graph: &Graph, subject: &Term) -> Result<()> {
    for (predicate, feature) in [
        (sh::AND, "sh:and"),
        (sh::XONE, "sh:xone"),
        (sh::NOT, "sh:not"),
        (sh::NODE, "sh:node"),
    ] {
        if graph.value(subject, predicate).is_some() {
            return Err(ShaclError::UnsupportedFeature {
                shape: subject.lexical(),
                feature: feature.to_string(),
            });
        }
    }
    Ok(())
}

fn literal_value(graph: &Graph, subject: &Term, predicate: &str) -> Option<String> {
    graph
        .value(subject, predicate)
        .and_then(|t| t.as_literal().map(|(v, _, _)| v.lexical()))
}

fn integer_value(graph: &Graph, subject: &Term, predicate: &str) -> Option<usize> {
    graph
        .value(subject, predicate)
        .and_then(|t| t.as_literal())
        .and_then(|(v, _, _)| v.as_integer())
        .and_then(|i| usize::try_from(i).ok())
}

fn shape_name(subject: &Term) -> String {
    match subject {
        Term::Iri(iri) => local_name(iri).to_string(),
        other => other.lexical(),
    }
}

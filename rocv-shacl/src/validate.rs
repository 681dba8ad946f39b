//! SHACL validation engine
//!
//! Validates a data graph against compiled shapes and produces a report of
//! entries keyed by source shape, which is how callers map findings back to
//! their own check identities.

use crate::compile::{self, CompiledShape, PropertyShape, Severity, Target};
use crate::constraints::{
    cardinality::{validate_max_count, validate_min_count},
    datatype::{validate_class, validate_datatype, validate_node_kind},
    pattern::{validate_max_length, validate_min_length, validate_pattern},
    value::{validate_has_value, validate_in},
    Constraint, ConstraintViolation,
};
use crate::error::Result;
use rocv_graph::{Graph, Term};
use tracing::debug;

/// One finding in a validation report
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// The node the shape was validated against
    pub focus_node: Term,
    /// The shape (node or property) that produced this entry
    pub source_shape: Term,
    /// The property path, when the failure is property-scoped
    pub path: Option<String>,
    /// The offending value, when a specific value failed
    pub value: Option<Term>,
    /// Severity of the failed shape
    pub severity: Severity,
    /// Human-readable message (sh:message or synthesized)
    pub message: String,
    /// The violated constraint component
    pub component: &'static str,
}

/// Result of validating a data graph against a set of shapes
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// True iff no entry was produced
    pub conforms: bool,
    /// The findings, sorted for deterministic output
    pub entries: Vec<ReportEntry>,
}

/// SHACL validation engine over compiled shapes
pub struct ShaclEngine {
    shapes: Vec<CompiledShape>,
}

impl ShaclEngine {
    /// Create an engine from already-compiled shapes
    pub fn new(shapes: Vec<CompiledShape>) -> Self {
        Self { shapes }
    }

    /// Compile a shapes graph and create an engine from it
    pub fn compile(shapes_graph: &Graph) -> Result<Self> {
        Ok(Self::new(compile::compile(shapes_graph)?))
    }

    /// The compiled shapes
    pub fn shapes(&self) -> &[CompiledShape] {
        &self.shapes
    }

    /// Check if there are any shapes to validate against
    ///
    /// With no shapes, validation is a no-op and callers can skip the
    /// data-graph walk entirely.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Validate a data graph against every non-deactivated shape
    pub fn validate(&self, data: &Graph) -> ValidationReport {
        let mut entries = Vec::new();

        for shape in &self.shapes {
            if shape.deactivated {
                continue;
            }
            for focus in focus_nodes(data, shape) {
                validate_shape(data, &focus, shape, &mut entries);
            }
        }

        entries.sort_by(|a, b| {
            (&a.focus_node, &a.source_shape, &a.path, &a.message).cmp(&(
                &b.focus_node,
                &b.source_shape,
                &b.path,
                &b.message,
            ))
        });
        debug!(entries = entries.len(), "validation report complete");

        ValidationReport {
            conforms: entries.is_empty(),
            entries,
        }
    }
}

/// Resolve the focus nodes a shape applies to
///
/// `sh:targetNode` targets are validated even when absent from the data
/// graph: constraints such as `sh:minCount` must fail for missing nodes.
fn focus_nodes(data: &Graph, shape: &CompiledShape) -> Vec<Term> {
    let mut nodes = Vec::new();
    for target in &shape.targets {
        match target {
            Target::Class(class) => {
                nodes.extend(data.subjects_of_type(class).into_iter().cloned());
            }
            Target::Node(node) => nodes.push(node.clone()),
            Target::SubjectsOf(predicate) => {
                for triple in data.iter() {
                    if triple.has_predicate(predicate) {
                        nodes.push(triple.s.clone());
                    }
                }
            }
            Target::ObjectsOf(predicate) => {
                for triple in data.iter() {
                    if triple.has_predicate(predicate) {
                        nodes.push(triple.o.clone());
                    }
                }
            }
        }
    }
    nodes.sort();
    nodes.dedup();
    nodes
}

fn validate_shape(
    data: &Graph,
    focus: &Term,
    shape: &CompiledShape,
    entries: &mut Vec<ReportEntry>,
) {
    // Node-level constraints apply to the focus node itself
    let focus_values = vec![focus];
    for constraint in &shape.node_constraints {
        for violation in check_constraint(data, constraint, &focus_values, None) {
            entries.push(entry_for(shape, None, focus, violation, shape.severity));
        }
    }

    for property in &shape.property_shapes {
        let values: Vec<&Term> = data.objects(focus, &property.path).collect();
        let severity = property.severity.unwrap_or(shape.severity);

        for constraint in &property.constraints {
            for violation in check_constraint(data, constraint, &values, Some(&property.path)) {
                entries.push(entry_for(shape, Some(property), focus, violation, severity));
            }
        }

        // sh:or - each value must satisfy at least one alternative set
        if !property.or_alternatives.is_empty() {
            for value in &values {
                let passes = property.or_alternatives.iter().any(|alternative| {
                    alternative.iter().all(|constraint| {
                        check_constraint(data, constraint, &[*value], Some(&property.path))
                            .is_empty()
                    })
                });
                if !passes {
                    let violation = ConstraintViolation::with_value(
                        "sh:OrConstraintComponent",
                        value,
                        format!(
                            "Value satisfies none of the {} sh:or alternatives",
                            property.or_alternatives.len()
                        ),
                    );
                    entries.push(entry_for(shape, Some(property), focus, violation, severity));
                }
            }
        }
    }
}

/// Evaluate one constraint over a value set, returning all violations
fn check_constraint(
    data: &Graph,
    constraint: &Constraint,
    values: &[&Term],
    path: Option<&str>,
) -> Vec<ConstraintViolation> {
    let path_text = path.unwrap_or("");
    match constraint {
        Constraint::MinCount(min) => {
            validate_min_count(values.len(), *min, path_text).into_iter().collect()
        }
        Constraint::MaxCount(max) => {
            validate_max_count(values.len(), *max, path_text).into_iter().collect()
        }
        Constraint::HasValue(expected) => {
            validate_has_value(values, expected).into_iter().collect()
        }
        per_value => values
            .iter()
            .filter_map(|value| match per_value {
                Constraint::Datatype(dt) => validate_datatype(value, dt),
                Constraint::NodeKind(kind) => validate_node_kind(value, *kind),
                Constraint::Class(class) => validate_class(value, class, data),
                Constraint::In(allowed) => validate_in(value, allowed),
                Constraint::Pattern { regex, source } => {
                    validate_pattern(value, regex, source)
                }
                Constraint::MinLength(min) => validate_min_length(value, *min),
                Constraint::MaxLength(max) => validate_max_length(value, *max),
                // Handled above
                Constraint::MinCount(_) | Constraint::MaxCount(_) | Constraint::HasValue(_) => {
                    None
                }
            })
            .collect(),
    }
}

fn entry_for(
    shape: &CompiledShape,
    property: Option<&PropertyShape>,
    focus: &Term,
    violation: ConstraintViolation,
    severity: Severity,
) -> ReportEntry {
    // sh:message on the nearest shape wins over the synthesized message
    let message = property
        .and_then(|p| p.message.clone())
        .or_else(|| shape.message.clone())
        .unwrap_or(violation.message);

    ReportEntry {
        focus_node: focus.clone(),
        source_shape: property.map(|p| p.id.clone()).unwrap_or_else(|| shape.id.clone()),
        path: property.map(|p| p.path.clone()),
        value: violation.value,
        severity,
        message,
        component: violation.component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocv_graph::turtle;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        @prefix schema: <http://schema.org/> .
        @prefix ex: <http://example.org/shapes#> .

        ex:DatasetShape a sh:NodeShape ;
            sh:targetClass schema:Dataset ;
            sh:property [
                sh:path schema:name ;
                sh:minCount 1 ;
                sh:datatype xsd:string ;
            ] ;
            sh:property [
                sh:path schema:license ;
                sh:severity sh:Warning ;
                sh:message "the dataset should declare a license" ;
                sh:minCount 1 ;
            ] .
    "#;

    fn engine() -> ShaclEngine {
        ShaclEngine::compile(&turtle::parse(SHAPES, None).unwrap()).unwrap()
    }

    fn data(ttl: &str) -> Graph {
        turtle::parse(ttl, None).unwrap()
    }

    #[test]
    fn test_conforming_data() {
        let report = engine().validate(&data(
            r#"
            @prefix schema: <http://schema.org/> .
            <http://x/> a schema:Dataset ;
                schema:name "demo" ;
                schema:license <https://spdx.org/licenses/MIT> .
            "#,
        ));
        assert!(report.conforms);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_missing_name_reports_with_path() {
        let report = engine().validate(&data(
            r#"
            @prefix schema: <http://schema.org/> .
            <http://x/> a schema:Dataset ;
                schema:license <https://spdx.org/licenses/MIT> .
            "#,
        ));
        assert!(!report.conforms);
        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!(entry.path.as_deref(), Some("http://schema.org/name"));
        assert_eq!(entry.severity, Severity::Violation);
        assert_eq!(entry.focus_node, Term::iri("http://x/"));
    }

    #[test]
    fn test_severity_and_message_from_shape() {
        let report = engine().validate(&data(
            r#"
            @prefix schema: <http://schema.org/> .
            <http://x/> a schema:Dataset ;
                schema:name "demo" .
            "#,
        ));
        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.message, "the dataset should declare a license");
    }

    #[test]
    fn test_target_node_validated_when_absent() {
        let shapes = turtle::parse(
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix schema: <http://schema.org/> .
            @prefix ex: <http://example.org/shapes#> .
            ex:Root a sh:NodeShape ;
                sh:targetNode <http://crate/> ;
                sh:property [ sh:path schema:about ; sh:minCount 1 ] .
            "#,
            None,
        )
        .unwrap();
        let engine = ShaclEngine::compile(&shapes).unwrap();
        let report = engine.validate(&Graph::new());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].focus_node, Term::iri("http://crate/"));
    }

    #[test]
    fn test_or_alternatives() {
        let shapes = turtle::parse(
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            @prefix schema: <http://schema.org/> .
            @prefix ex: <http://example.org/shapes#> .
            ex:S a sh:NodeShape ;
                sh:targetClass schema:Dataset ;
                sh:property [
                    sh:path schema:license ;
                    sh:or ( [ sh:nodeKind sh:IRI ] [ sh:datatype xsd:string ] ) ;
                ] .
            "#,
            None,
        )
        .unwrap();
        let engine = ShaclEngine::compile(&shapes).unwrap();

        let good = engine.validate(&data(
            r#"
            @prefix schema: <http://schema.org/> .
            <http://x/> a schema:Dataset ; schema:license "MIT" .
            "#,
        ));
        assert!(good.conforms);

        let bad = engine.validate(&data(
            r#"
            @prefix schema: <http://schema.org/> .
            <http://x/> a schema:Dataset ; schema:license 42 .
            "#,
        ));
        assert_eq!(bad.entries.len(), 1);
        assert_eq!(bad.entries[0].component, "sh:OrConstraintComponent");
    }

    #[test]
    fn test_deterministic_report_order() {
        let ttl = r#"
            @prefix schema: <http://schema.org/> .
            <http://b/> a schema:Dataset .
            <http://a/> a schema:Dataset .
        "#;
        let first = engine().validate(&data(ttl));
        let second = engine().validate(&data(ttl));
        let keys = |r: &ValidationReport| {
            r.entries
                .iter()
                .map(|e| (e.focus_node.clone(), e.path.clone(), e.message.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&first), keys(&second));
        // Both datasets fail name + license: four entries, sorted by focus
        assert_eq!(first.entries.len(), 4);
        assert!(first.entries[0].focus_node <= first.entries[3].focus_node);
    }
}

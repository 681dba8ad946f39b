//! Value type constraints: sh:datatype, sh:nodeKind, sh:class

use super::{ConstraintViolation, NodeKind};
use rocv_graph::{Graph, Term};

/// Validate sh:datatype against a single value
pub fn validate_datatype(value: &Term, datatype: &str) -> Option<ConstraintViolation> {
    match value.as_literal() {
        Some((_, dt, _)) if dt == datatype => None,
        Some((_, dt, _)) => Some(ConstraintViolation::with_value(
            "sh:DatatypeConstraintComponent",
            value,
            format!("Value does not have datatype <{}> (found <{}>)", datatype, dt),
        )),
        None => Some(ConstraintViolation::with_value(
            "sh:DatatypeConstraintComponent",
            value,
            format!("Value is not a literal with datatype <{}>", datatype),
        )),
    }
}

/// Validate sh:nodeKind against a single value
pub fn validate_node_kind(value: &Term, kind: NodeKind) -> Option<ConstraintViolation> {
    let ok = match kind {
        NodeKind::Iri => value.is_iri(),
        NodeKind::BlankNode => value.is_blank(),
        NodeKind::Literal => value.is_literal(),
        NodeKind::IriOrLiteral => value.is_iri() || value.is_literal(),
        NodeKind::BlankNodeOrIri => value.is_blank() || value.is_iri(),
    };
    if ok {
        return None;
    }
    Some(ConstraintViolation::with_value(
        "sh:NodeKindConstraintComponent",
        value,
        format!("Value is not of node kind {}", kind.name()),
    ))
}

/// Validate sh:class: the value must be an instance of the class in `data`
pub fn validate_class(value: &Term, class: &str, data: &Graph) -> Option<ConstraintViolation> {
    if value.is_literal() {
        return Some(ConstraintViolation::with_value(
            "sh:ClassConstraintComponent",
            value,
            format!("Literal value cannot be an instance of <{}>", class),
        ));
    }
    let class_term = Term::iri(class);
    if data.types_of(value).any(|t| t == &class_term) {
        return None;
    }
    Some(ConstraintViolation::with_value(
        "sh:ClassConstraintComponent",
        value,
        format!("Value is not an instance of <{}>", class),
    ))
}

//! String constraints: sh:pattern, sh:minLength, sh:maxLength
//!
//! Per SHACL these apply to the string representation of the value: the
//! lexical form for literals, the IRI text for IRIs. Blank nodes always
//! fail.

use super::ConstraintViolation;
use regex::Regex;
use rocv_graph::Term;

/// The string form a string-facet constraint is evaluated against
fn string_form(value: &Term) -> Option<String> {
    match value {
        Term::BlankNode(_) => None,
        other => Some(other.lexical()),
    }
}

/// Validate sh:pattern against a single value
pub fn validate_pattern(
    value: &Term,
    regex: &Regex,
    source: &str,
) -> Option<ConstraintViolation> {
    match string_form(value) {
        Some(text) if regex.is_match(&text) => None,
        Some(_) => Some(ConstraintViolation::with_value(
            "sh:PatternConstraintComponent",
            value,
            format!("Value does not match pattern \"{}\"", source),
        )),
        None => Some(ConstraintViolation::with_value(
            "sh:PatternConstraintComponent",
            value,
            "Blank node cannot match a pattern".to_string(),
        )),
    }
}

/// Validate sh:minLength against a single value
pub fn validate_min_length(value: &Term, min: usize) -> Option<ConstraintViolation> {
    match string_form(value) {
        Some(text) if text.chars().count() >= min => None,
        _ => Some(ConstraintViolation::with_value(
            "sh:MinLengthConstraintComponent",
            value,
            format!("Value is shorter than {} characters", min),
        )),
    }
}

/// Validate sh:maxLength against a single value
pub fn validate_max_length(value: &Term, max: usize) -> Option<ConstraintViolation> {
    match string_form(value) {
        Some(text) if text.chars().count() <= max => None,
        _ => Some(ConstraintViolation::with_value(
            "sh:MaxLengthConstraintComponent",
            value,
            format!("Value is longer than {} characters", max),
        )),
    }
}

//! Value constraints: sh:hasValue, sh:in

use super::ConstraintViolation;
use rocv_graph::Term;

/// Validate sh:hasValue against the full value set of a path
pub fn validate_has_value(values: &[&Term], expected: &Term) -> Option<ConstraintViolation> {
    if values.iter().any(|v| *v == expected) {
        return None;
    }
    Some(ConstraintViolation::of(
        "sh:HasValueConstraintComponent",
        format!("Required value {} is missing", expected),
    ))
}

/// Validate sh:in against a single value
pub fn validate_in(value: &Term, allowed: &[Term]) -> Option<ConstraintViolation> {
    if allowed.contains(value) {
        return None;
    }
    Some(ConstraintViolation::with_value(
        "sh:InConstraintComponent",
        value,
        format!("Value is not one of the {} allowed values", allowed.len()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_value() {
        let a = Term::string("a");
        let b = Term::string("b");
        let values = vec![&a, &b];
        assert!(validate_has_value(&values, &Term::string("a")).is_none());
        assert!(validate_has_value(&values, &Term::string("c")).is_some());
        assert!(validate_has_value(&[], &Term::string("a")).is_some());
    }

    #[test]
    fn test_in() {
        let allowed = vec![Term::string("a"), Term::integer(1)];
        assert!(validate_in(&Term::string("a"), &allowed).is_none());
        assert!(validate_in(&Term::integer(1), &allowed).is_none());
        assert!(validate_in(&Term::string("z"), &allowed).is_some());
    }
}

//! Cardinality constraints: sh:minCount, sh:maxCount

use super::ConstraintViolation;

/// Validate sh:minCount against the number of values of a path
pub fn validate_min_count(count: usize, min: usize, path: &str) -> Option<ConstraintViolation> {
    if count >= min {
        return None;
    }
    Some(ConstraintViolation::of(
        "sh:MinCountConstraintComponent",
        format!(
            "Less than {} value(s) for <{}>: found {}",
            min, path, count
        ),
    ))
}

/// Validate sh:maxCount against the number of values of a path
pub fn validate_max_count(count: usize, max: usize, path: &str) -> Option<ConstraintViolation> {
    if count <= max {
        return None;
    }
    Some(ConstraintViolation::of(
        "sh:MaxCountConstraintComponent",
        format!(
            "More than {} value(s) for <{}>: found {}",
            max, path, count
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_count() {
        assert!(validate_min_count(1, 1, "http://p").is_none());
        assert!(validate_min_count(2, 1, "http://p").is_none());
        let v = validate_min_count(0, 1, "http://p").unwrap();
        assert!(v.message.contains("Less than 1"));
        assert!(v.value.is_none());
    }

    #[test]
    fn test_max_count() {
        assert!(validate_max_count(1, 1, "http://p").is_none());
        assert!(validate_max_count(0, 1, "http://p").is_none());
        assert!(validate_max_count(2, 1, "http://p").is_some());
    }
}

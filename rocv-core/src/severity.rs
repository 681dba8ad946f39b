//! Severity levels and RFC 2119 requirement levels
//!
//! Severities form the ordered set `OPTIONAL < RECOMMENDED < REQUIRED`.
//! The configured requirement-severity threshold selects which checks run:
//! a check runs iff its effective severity is at or above the threshold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strength of a conformance condition
///
/// Derived ordering follows declaration order, so
/// `Optional < Recommended < Required`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// MAY / OPTIONAL conditions
    Optional,
    /// SHOULD / RECOMMENDED conditions
    Recommended,
    /// MUST / REQUIRED conditions
    #[default]
    Required,
}

impl Severity {
    /// Map a SHACL severity to the validator's scale
    pub fn from_shacl(severity: rocv_shacl::Severity) -> Self {
        match severity {
            rocv_shacl::Severity::Violation => Severity::Required,
            rocv_shacl::Severity::Warning => Severity::Recommended,
            rocv_shacl::Severity::Info => Severity::Optional,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Optional => "OPTIONAL",
            Severity::Recommended => "RECOMMENDED",
            Severity::Required => "REQUIRED",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPTIONAL" => Ok(Severity::Optional),
            "RECOMMENDED" => Ok(Severity::Recommended),
            "REQUIRED" => Ok(Severity::Required),
            other => Err(format!("invalid severity: {}", other)),
        }
    }
}

/// An RFC 2119 keyword bound to a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequirementLevel {
    /// The keyword as written (MUST, SHOULD, MAY, ...)
    pub name: &'static str,
    /// The severity the keyword maps to
    pub severity: Severity,
}

impl fmt::Display for RequirementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The RFC 2119 keyword collection
pub mod levels {
    use super::{RequirementLevel, Severity};

    pub const MUST: RequirementLevel = RequirementLevel {
        name: "MUST",
        severity: Severity::Required,
    };
    pub const MUST_NOT: RequirementLevel = RequirementLevel {
        name: "MUST_NOT",
        severity: Severity::Required,
    };
    pub const SHALL: RequirementLevel = RequirementLevel {
        name: "SHALL",
        severity: Severity::Required,
    };
    pub const SHALL_NOT: RequirementLevel = RequirementLevel {
        name: "SHALL_NOT",
        severity: Severity::Required,
    };
    pub const REQUIRED: RequirementLevel = RequirementLevel {
        name: "REQUIRED",
        severity: Severity::Required,
    };
    pub const SHOULD: RequirementLevel = RequirementLevel {
        name: "SHOULD",
        severity: Severity::Recommended,
    };
    pub const SHOULD_NOT: RequirementLevel = RequirementLevel {
        name: "SHOULD_NOT",
        severity: Severity::Recommended,
    };
    pub const RECOMMENDED: RequirementLevel = RequirementLevel {
        name: "RECOMMENDED",
        severity: Severity::Recommended,
    };
    pub const MAY: RequirementLevel = RequirementLevel {
        name: "MAY",
        severity: Severity::Optional,
    };
    pub const OPTIONAL: RequirementLevel = RequirementLevel {
        name: "OPTIONAL",
        severity: Severity::Optional,
    };

    /// Look up a keyword by name, case-insensitive
    pub fn get(name: &str) -> Option<RequirementLevel> {
        match name.to_ascii_uppercase().as_str() {
            "MUST" => Some(MUST),
            "MUST_NOT" => Some(MUST_NOT),
            "SHALL" => Some(SHALL),
            "SHALL_NOT" => Some(SHALL_NOT),
            "REQUIRED" => Some(REQUIRED),
            "SHOULD" => Some(SHOULD),
            "SHOULD_NOT" => Some(SHOULD_NOT),
            "RECOMMENDED" => Some(RECOMMENDED),
            "MAY" => Some(MAY),
            "OPTIONAL" => Some(OPTIONAL),
            _ => None,
        }
    }

    /// The level a shape-file folder name declares (`must`, `should`, `may`)
    pub fn from_folder_name(name: &str) -> Option<RequirementLevel> {
        get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Optional < Severity::Recommended);
        assert!(Severity::Recommended < Severity::Required);
    }

    #[test]
    fn test_severity_round_trip() {
        for severity in [Severity::Optional, Severity::Recommended, Severity::Required] {
            assert_eq!(severity.to_string().parse::<Severity>().unwrap(), severity);
        }
        assert!("bogus".parse::<Severity>().is_err());
        assert_eq!("required".parse::<Severity>().unwrap(), Severity::Required);
    }

    #[test]
    fn test_levels() {
        assert_eq!(levels::get("must").unwrap().severity, Severity::Required);
        assert_eq!(levels::get("SHOULD").unwrap().severity, Severity::Recommended);
        assert_eq!(levels::get("may").unwrap().severity, Severity::Optional);
        assert!(levels::get("perhaps").is_none());
    }

    #[test]
    fn test_shacl_mapping() {
        assert_eq!(
            Severity::from_shacl(rocv_shacl::Severity::Violation),
            Severity::Required
        );
        assert_eq!(
            Severity::from_shacl(rocv_shacl::Severity::Warning),
            Severity::Recommended
        );
        assert_eq!(
            Severity::from_shacl(rocv_shacl::Severity::Info),
            Severity::Optional
        );
    }
}

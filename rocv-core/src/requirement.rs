//! Requirements and checks
//!
//! A requirement is a named unit of conformance within a profile, holding
//! one or more checks. Checks are a tagged variant: SHACL shape checks run
//! in a batch per profile, programmatic checks are predicates over the
//! loaded crate.

use crate::rocrate::RoCrate;
use crate::severity::{RequirementLevel, Severity};

/// A finding reported by a programmatic check
#[derive(Debug, Clone)]
pub struct ProgrammaticFinding {
    /// Human-readable message
    pub message: String,
    /// Offending entity `@id`, when known
    pub focus_node: Option<String>,
    /// Property path the finding concerns, when known
    pub path: Option<String>,
}

impl ProgrammaticFinding {
    /// A finding with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            focus_node: None,
            path: None,
        }
    }

    /// A finding citing an entity and a property path
    pub fn on_entity(
        message: impl Into<String>,
        focus_node: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            focus_node: Some(focus_node.into()),
            path: Some(path.into()),
        }
    }
}

/// A programmatic check predicate
///
/// Returns the findings for the crate; an `Err` is an internal check
/// failure and is converted to a REQUIRED engine issue by the executor.
pub type ProgrammaticFn = fn(&RoCrate) -> Result<Vec<ProgrammaticFinding>, String>;

/// How a check is executed
#[derive(Debug, Clone)]
pub enum CheckBody {
    /// A SHACL property or node shape, keyed into the registry shape table
    Shape {
        /// The rewritten stable shape key (an IRI)
        shape_key: String,
    },
    /// A predicate over the loaded crate
    Programmatic {
        /// The predicate to run
        run: ProgrammaticFn,
    },
}

/// The atomic unit executed against a crate
#[derive(Debug, Clone)]
pub struct Check {
    /// Identifier, unique within its requirement
    pub identifier: String,
    /// Human-readable name
    pub name: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Per-check severity override (e.g. from sh:severity)
    pub severity: Option<Severity>,
    /// Message template interpolated into issues, when declared
    pub message: Option<String>,
    /// Execution variant
    pub body: CheckBody,
}

impl Check {
    /// The effective severity given the owning requirement's level
    pub fn effective_severity(&self, requirement_level: RequirementLevel) -> Severity {
        self.severity.unwrap_or(requirement_level.severity)
    }
}

/// A named unit of conformance within a profile
#[derive(Debug, Clone)]
pub struct Requirement {
    /// Identifier, stable across profile versions
    pub identifier: String,
    /// Human-readable name
    pub name: String,
    /// Human-readable description
    pub description: Option<String>,
    /// The requirement level (from the severity folder or an override)
    pub level: RequirementLevel,
    /// The ordered checks
    pub checks: Vec<Check>,
}

impl Requirement {
    /// True iff any check's effective severity is at or above `threshold`
    pub fn applies_at(&self, threshold: Severity) -> bool {
        self.checks
            .iter()
            .any(|c| c.effective_severity(self.level) >= threshold)
    }
}

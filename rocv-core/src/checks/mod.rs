//! Built-in programmatic checks
//!
//! SHACL covers graph-shape conformance; anything that needs the crate
//! *contents* (file presence, workflow availability) is a programmatic
//! check. Checks are compiled in and attached to profiles by identifier
//! token when the registry loads a profile directory.

mod ro_crate;
mod workflow;

use crate::requirement::{Check, CheckBody, ProgrammaticFn, Requirement};
use crate::severity::RequirementLevel;

/// Declaration of a built-in programmatic requirement
pub struct ProgrammaticRequirement {
    /// Requirement identifier, stable across versions
    pub identifier: &'static str,
    /// Display name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// Requirement level
    pub level: RequirementLevel,
    /// The checks, as `(identifier, description, predicate)`
    pub checks: &'static [(&'static str, &'static str, ProgrammaticFn)],
}

impl ProgrammaticRequirement {
    /// Materialize into the registry's requirement model
    pub fn to_requirement(&self) -> Requirement {
        Requirement {
            identifier: self.identifier.to_string(),
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            level: self.level,
            checks: self
                .checks
                .iter()
                .map(|(identifier, description, run)| Check {
                    identifier: identifier.to_string(),
                    name: None,
                    description: Some(description.to_string()),
                    severity: None,
                    message: None,
                    body: CheckBody::Programmatic { run: *run },
                })
                .collect(),
        }
    }
}

/// The built-in programmatic requirements for a profile token
pub fn builtin_requirements(token: &str) -> &'static [ProgrammaticRequirement] {
    match token {
        "ro-crate" => ro_crate::REQUIREMENTS,
        "workflow-ro-crate" => workflow::REQUIREMENTS,
        _ => &[],
    }
}

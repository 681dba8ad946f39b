//! Validation result value types
//!
//! Issues are created by the executor, attached to the result, and never
//! mutated. The result keeps its issue list sorted and de-duplicated by
//! `(check, focus, path, message)` so repeated runs over the same crate
//! produce identical output.

use crate::severity::Severity;
use serde::Serialize;
use std::fmt;

/// Reserved requirement identifier for engine-internal issues
pub const ENGINE_INTERNAL: &str = "__engine_internal__";

/// Full identity of a check: profile, requirement, and check identifiers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CheckId {
    /// Owning profile identifier
    pub profile: String,
    /// Requirement identifier
    pub requirement: String,
    /// Check identifier (unique within the requirement)
    pub check: String,
}

impl CheckId {
    /// Build a check identity
    pub fn new(
        profile: impl Into<String>,
        requirement: impl Into<String>,
        check: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.into(),
            requirement: requirement.into(),
            check: check.into(),
        }
    }

    /// An engine-internal identity (`__engine_internal__` requirement)
    pub fn internal(profile: impl Into<String>, kind: &str) -> Self {
        Self::new(profile, ENGINE_INTERNAL, kind)
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.profile, self.requirement, self.check)
    }
}

/// A single conformance finding
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Issue {
    /// The failing check
    pub check: CheckId,
    /// Severity of the failing check
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Offending entity `@id`, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_node: Option<String>,
    /// Property path from the crate graph, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<String>,
    /// The offending value, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The outcome of a validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// The crate that was validated
    pub crate_uri: String,
    /// The selected profile identifiers, in execution order
    pub profiles: Vec<String>,
    /// The configured requirement-severity threshold
    pub threshold: Severity,
    /// True when the run was cancelled before completing
    pub cancelled: bool,
    issues: Vec<Issue>,
}

impl ValidationResult {
    /// An empty result for a run about to start
    pub fn new(crate_uri: impl Into<String>, profiles: Vec<String>, threshold: Severity) -> Self {
        Self {
            crate_uri: crate_uri.into(),
            profiles,
            threshold,
            cancelled: false,
            issues: Vec::new(),
        }
    }

    /// Record an issue, keeping the list sorted and de-duplicated
    ///
    /// The de-duplication key is `(check, focus node, path, message)`, so a
    /// shared parent profile executed under several selected profiles
    /// reports each finding once. Returns true when the issue was new.
    pub fn add_issue(&mut self, issue: Issue) -> bool {
        let duplicate = self.issues.iter().any(|existing| {
            existing.check == issue.check
                && existing.focus_node == issue.focus_node
                && existing.result_path == issue.result_path
                && existing.message == issue.message
        });
        if duplicate {
            return false;
        }
        match self.issues.binary_search(&issue) {
            Ok(_) => false,
            Err(position) => {
                self.issues.insert(position, issue);
                true
            }
        }
    }

    /// All issues, sorted
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues at or above a severity
    pub fn issues_at(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity >= severity)
    }

    /// True when any issue is at or above the severity
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues_at(severity).next().is_some()
    }

    /// True when the crate passed at the given severity
    pub fn passed(&self, severity: Severity) -> bool {
        !self.has_issues_at(severity)
    }

    /// True when the crate passed at the configured threshold
    pub fn is_valid(&self) -> bool {
        self.passed(self.threshold)
    }

    /// Serialize the result to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(check: &str, severity: Severity, message: &str) -> Issue {
        Issue {
            check: CheckId::new("p-1.0", "req", check),
            severity,
            message: message.to_string(),
            focus_node: None,
            result_path: None,
            value: None,
        }
    }

    #[test]
    fn test_dedup_and_order() {
        let mut result = ValidationResult::new("x", vec!["p-1.0".into()], Severity::Required);
        assert!(result.add_issue(issue("b", Severity::Required, "m")));
        assert!(result.add_issue(issue("a", Severity::Required, "m")));
        // Exact duplicate is dropped
        assert!(!result.add_issue(issue("b", Severity::Required, "m")));
        assert_eq!(result.issues().len(), 2);
        assert_eq!(result.issues()[0].check.check, "a");
    }

    #[test]
    fn test_validity_threshold_equivalence() {
        let mut result = ValidationResult::new("x", vec![], Severity::Required);
        result.add_issue(issue("a", Severity::Recommended, "m"));

        // valid at T iff no issue with severity >= T
        assert!(result.passed(Severity::Required));
        assert!(!result.passed(Severity::Recommended));
        assert!(!result.passed(Severity::Optional));
        assert!(result.is_valid());
        assert!(result.has_issues_at(Severity::Optional));
        assert!(!result.has_issues_at(Severity::Required));
    }

    #[test]
    fn test_check_id_display() {
        let id = CheckId::new("workflow-ro-crate-1.0", "main_workflow", "main_workflow_presence");
        assert_eq!(
            id.to_string(),
            "workflow-ro-crate-1.0.main_workflow.main_workflow_presence"
        );
        let internal = CheckId::internal("p", "check_internal_error");
        assert_eq!(internal.requirement, ENGINE_INTERNAL);
    }

    #[test]
    fn test_json_shape() {
        let mut result = ValidationResult::new("x", vec!["p".into()], Severity::Required);
        result.add_issue(issue("a", Severity::Required, "m"));
        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["threshold"], "REQUIRED");
        assert_eq!(json["issues"][0]["check"]["check"], "a");
    }
}

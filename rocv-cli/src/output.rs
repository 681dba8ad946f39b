//! Result rendering

use colored::Colorize;
use rocv_core::{Severity, ValidationResult};

/// Color a severity name for terminal output
fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Required => "REQUIRED".red().bold().to_string(),
        Severity::Recommended => "RECOMMENDED".yellow().bold().to_string(),
        Severity::Optional => "OPTIONAL".cyan().to_string(),
    }
}

/// Render a validation result as human-readable text
pub fn render_text(result: &ValidationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Validating {} against {}\n",
        result.crate_uri.bold(),
        result.profiles.join(", ")
    ));

    if result.cancelled {
        out.push_str(&format!("{}\n", "validation cancelled".yellow().bold()));
    }

    let issues: Vec<_> = result.issues_at(result.threshold).collect();
    if issues.is_empty() {
        out.push_str(&format!(
            "{} no issues at or above {}\n",
            "ok:".green().bold(),
            result.threshold
        ));
        return out;
    }

    out.push_str(&format!(
        "{} {} issue(s) at or above {}\n\n",
        "fail:".red().bold(),
        issues.len(),
        result.threshold
    ));
    for issue in issues {
        out.push_str(&format!(
            "  [{}] {}\n      {}\n",
            severity_label(issue.severity),
            issue.check.to_string().bold(),
            issue.message
        ));
        if let Some(path) = &issue.result_path {
            out.push_str(&format!("      path: {}\n", path));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocv_core::{CheckId, Severity};

    #[test]
    fn test_render_passing_result() {
        colored::control::set_override(false);
        let result = ValidationResult::new(
            "/tmp/crate",
            vec!["ro-crate-1.1".to_string()],
            Severity::Required,
        );
        let text = render_text(&result);
        assert!(text.contains("ok:"));
        assert!(text.contains("ro-crate-1.1"));
    }

    #[test]
    fn test_render_failing_result() {
        colored::control::set_override(false);
        let mut result = ValidationResult::new(
            "/tmp/crate",
            vec!["ro-crate-1.1".to_string()],
            Severity::Required,
        );
        result.add_issue(rocv_core::Issue {
            check: CheckId::new("ro-crate-1.1", "data_entity_existence", "file_presence"),
            severity: Severity::Required,
            message: "Data entity data/x.txt is not present in the crate contents".to_string(),
            focus_node: Some("data/x.txt".to_string()),
            result_path: Some("http://schema.org/hasPart".to_string()),
            value: None,
        });
        let text = render_text(&result);
        assert!(text.contains("fail:"));
        assert!(text.contains("file_presence"));
        assert!(text.contains("data/x.txt"));
    }
}

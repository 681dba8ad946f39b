//! Programmatic checks for the workflow-ro-crate profile

use super::ProgrammaticRequirement;
use crate::requirement::ProgrammaticFinding;
use crate::rocrate::RoCrate;
use crate::severity::levels;

pub(super) const REQUIREMENTS: &[ProgrammaticRequirement] = &[ProgrammaticRequirement {
    identifier: "main_workflow",
    name: "Main Workflow file existence",
    description: "The crate MUST declare a mainEntity whose file is present in the contents",
    level: levels::MUST,
    checks: &[(
        "main_workflow_presence",
        "Check that the main workflow file exists in the crate",
        check_main_workflow,
    )],
}];

fn check_main_workflow(rocrate: &RoCrate) -> Result<Vec<ProgrammaticFinding>, String> {
    let Some(workflow_id) = rocrate.main_workflow_id() else {
        return Ok(vec![ProgrammaticFinding::on_entity(
            "The root data entity does not declare a mainEntity workflow",
            rocrate.root_raw_id(),
            "http://schema.org/mainEntity",
        )]);
    };
    if workflow_id.contains("://") || rocrate.file_exists(&workflow_id) {
        return Ok(Vec::new());
    }
    Ok(vec![ProgrammaticFinding::on_entity(
        format!("Main workflow {} not found in the crate contents", workflow_id),
        workflow_id,
        "http://schema.org/mainEntity",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rocrate::{LoaderOptions, METADATA_FILE};
    use crate::uri::CrateUri;
    use serde_json::json;
    use std::str::FromStr;

    fn load(metadata: serde_json::Value, files: &[&str]) -> (tempfile::TempDir, RoCrate) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(METADATA_FILE),
            serde_json::to_string(&metadata).unwrap(),
        )
        .unwrap();
        for file in files {
            std::fs::write(dir.path().join(file), b"x").unwrap();
        }
        let uri = CrateUri::from_str(&dir.path().to_string_lossy()).unwrap();
        let rocrate = RoCrate::load(&uri, &LoaderOptions::default()).unwrap();
        (dir, rocrate)
    }

    fn workflow_metadata(main_entity: Option<&str>) -> serde_json::Value {
        let mut root = json!({
            "@id": "./",
            "@type": "Dataset"
        });
        if let Some(id) = main_entity {
            root["mainEntity"] = json!({"@id": id});
        }
        json!({
            "@context": "https://w3id.org/ro/crate/1.1/context",
            "@graph": [
                {
                    "@id": "ro-crate-metadata.json",
                    "@type": "CreativeWork",
                    "about": {"@id": "./"}
                },
                root
            ]
        })
    }

    #[test]
    fn test_main_workflow_present() {
        let (_dir, rocrate) = load(
            workflow_metadata(Some("sort-and-change-case.ga")),
            &["sort-and-change-case.ga"],
        );
        assert!(check_main_workflow(&rocrate).unwrap().is_empty());
    }

    #[test]
    fn test_main_workflow_missing_file() {
        let (_dir, rocrate) = load(workflow_metadata(Some("workflow.cwl")), &[]);
        let findings = check_main_workflow(&rocrate).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("workflow.cwl"));
    }

    #[test]
    fn test_main_entity_undeclared() {
        let (_dir, rocrate) = load(workflow_metadata(None), &[]);
        let findings = check_main_workflow(&rocrate).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("mainEntity"));
    }
}

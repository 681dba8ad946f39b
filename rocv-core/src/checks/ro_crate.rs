//! Programmatic checks for the base ro-crate profile

use super::ProgrammaticRequirement;
use crate::rocrate::{RoCrate, METADATA_FILE};
use crate::severity::levels;
use crate::requirement::ProgrammaticFinding;
use serde_json::Value as JsonValue;

pub(super) const REQUIREMENTS: &[ProgrammaticRequirement] = &[
    ProgrammaticRequirement {
        identifier: "file_descriptor_existence",
        name: "RO-Crate Metadata File Descriptor existence",
        description: "The crate MUST contain the ro-crate-metadata.json file descriptor",
        level: levels::MUST,
        checks: &[
            (
                "file_descriptor",
                "Check that ro-crate-metadata.json is present in the crate contents",
                check_file_descriptor,
            ),
            (
                "file_descriptor_entity",
                "Check that the metadata document describes itself through an entity with an about reference",
                check_file_descriptor_entity,
            ),
        ],
    },
    ProgrammaticRequirement {
        identifier: "data_entity_existence",
        name: "Data entity resource availability",
        description: "Data entities with relative identifiers MUST resolve to crate contents",
        level: levels::MUST,
        checks: &[(
            "file_presence",
            "Check that every data entity with a relative identifier is present in the crate",
            check_file_presence,
        )],
    },
];

fn check_file_descriptor(
    rocrate: &RoCrate,
) -> Result<Vec<ProgrammaticFinding>, String> {
    if rocrate.file_exists(METADATA_FILE) {
        return Ok(Vec::new());
    }
    Ok(vec![ProgrammaticFinding::message(format!(
        "{} is not present in the crate contents",
        METADATA_FILE
    ))])
}

fn check_file_descriptor_entity(
    rocrate: &RoCrate,
) -> Result<Vec<ProgrammaticFinding>, String> {
    let Some(descriptor) = rocrate.descriptor() else {
        return Ok(vec![ProgrammaticFinding::message(format!(
            "the metadata document has no {} entity",
            METADATA_FILE
        ))]);
    };
    if descriptor.get("about").is_none() {
        return Ok(vec![ProgrammaticFinding::on_entity(
            "the metadata file descriptor does not reference the root data entity",
            METADATA_FILE,
            "http://schema.org/about",
        )]);
    }
    Ok(Vec::new())
}

/// Whether an entity is a data entity (`File`/`MediaObject` or `Dataset`)
fn is_data_entity(entity: &JsonValue) -> bool {
    let types = match entity.get("@type") {
        Some(JsonValue::String(t)) => vec![t.as_str()],
        Some(JsonValue::Array(a)) => a.iter().filter_map(JsonValue::as_str).collect(),
        _ => return false,
    };
    types
        .iter()
        .any(|t| matches!(*t, "File" | "MediaObject" | "Dataset"))
}

fn check_file_presence(rocrate: &RoCrate) -> Result<Vec<ProgrammaticFinding>, String> {
    let root_id = rocrate.root_raw_id();
    let mut findings = Vec::new();

    // Every hasPart target plus every File/Dataset entity with a relative
    // identifier must resolve through the contents oracle.
    let mut candidates: Vec<String> = rocrate.has_part_ids();
    for entity in rocrate.entities() {
        let Some(id) = entity.get("@id").and_then(JsonValue::as_str) else {
            continue;
        };
        if is_data_entity(entity) && !candidates.iter().any(|c| c == id) {
            candidates.push(id.to_string());
        }
    }

    for id in candidates {
        if id == root_id || id == METADATA_FILE {
            continue;
        }
        // Web data entities are not local contents
        if id.contains("://") {
            continue;
        }
        // Only data entities count; a hasPart target with no entity of its
        // own is still expected to exist.
        if let Some(entity) = rocrate.entity(&id) {
            if !is_data_entity(entity) && entity.get("@type").is_some() {
                continue;
            }
        }
        if !rocrate.file_exists(&id) {
            findings.push(ProgrammaticFinding::on_entity(
                format!("Data entity {} is not present in the crate contents", id),
                id,
                "http://schema.org/hasPart",
            ));
        }
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rocrate::LoaderOptions;
    use crate::uri::CrateUri;
    use serde_json::json;
    use std::str::FromStr;

    fn crate_with(metadata: serde_json::Value, files: &[&str]) -> (tempfile::TempDir, RoCrate) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(METADATA_FILE),
            serde_json::to_string(&metadata).unwrap(),
        )
        .unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            if file.ends_with('/') {
                std::fs::create_dir_all(&path).unwrap();
            } else {
                std::fs::write(&path, b"x").unwrap();
            }
        }
        let uri = CrateUri::from_str(&dir.path().to_string_lossy()).unwrap();
        let rocrate = RoCrate::load(&uri, &LoaderOptions::default()).unwrap();
        (dir, rocrate)
    }

    fn metadata(parts: serde_json::Value) -> serde_json::Value {
        json!({
            "@context": "https://w3id.org/ro/crate/1.1/context",
            "@graph": [
                {
                    "@id": "ro-crate-metadata.json",
                    "@type": "CreativeWork",
                    "about": {"@id": "./"}
                },
                {
                    "@id": "./",
                    "@type": "Dataset",
                    "hasPart": parts
                }
            ]
        })
    }

    #[test]
    fn test_file_presence_missing_part() {
        let (_dir, rocrate) = crate_with(
            metadata(json!([{"@id": "outputs/tac_on_data_360_1.txt"}])),
            &[],
        );
        let findings = check_file_presence(&rocrate).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("outputs/tac_on_data_360_1.txt"));
        assert_eq!(
            findings[0].focus_node.as_deref(),
            Some("outputs/tac_on_data_360_1.txt")
        );
    }

    #[test]
    fn test_file_presence_all_present() {
        let (_dir, rocrate) = crate_with(
            metadata(json!([{"@id": "data/out.txt"}])),
            &["data/out.txt"],
        );
        assert!(check_file_presence(&rocrate).unwrap().is_empty());
    }

    #[test]
    fn test_directory_without_trailing_slash_tolerated() {
        let mut doc = metadata(json!([{"@id": "foo"}]));
        doc["@graph"]
            .as_array_mut()
            .unwrap()
            .push(json!({"@id": "foo", "@type": "Dataset"}));
        let (_dir, rocrate) = crate_with(doc, &["foo/"]);
        assert!(check_file_presence(&rocrate).unwrap().is_empty());
    }

    #[test]
    fn test_web_entities_skipped() {
        let (_dir, rocrate) = crate_with(
            metadata(json!([{"@id": "https://example.org/remote.txt"}])),
            &[],
        );
        assert!(check_file_presence(&rocrate).unwrap().is_empty());
    }

    #[test]
    fn test_file_descriptor_present() {
        let (_dir, rocrate) = crate_with(metadata(json!([])), &[]);
        assert!(check_file_descriptor(&rocrate).unwrap().is_empty());
    }
}

//! RO-Crate loading and content access
//!
//! A crate is loaded once per validation call and is immutable afterwards.
//! The three URI shapes (directory, local zip, remote zip) converge on one
//! `RoCrate` value exposing the metadata document, a graph view of it, and
//! a file-existence oracle over the crate contents.

use crate::errors::LoaderError;
use crate::fetch;
use crate::uri::CrateUri;
use rocv_graph::{jsonld, Graph};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// File name of the crate metadata descriptor
pub const METADATA_FILE: &str = "ro-crate-metadata.json";

/// Loader configuration
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Download cache directory for remote crates (default: user cache dir)
    pub cache_dir: Option<PathBuf>,
}

/// The crate contents backing store
#[derive(Debug)]
enum CrateSource {
    /// A directory on disk
    Directory { root: PathBuf },
    /// A zip archive, reduced to its entry-name list after metadata read
    Zip { entries: Vec<String> },
}

/// A loaded RO-Crate
#[derive(Debug)]
pub struct RoCrate {
    uri: CrateUri,
    base: String,
    source: CrateSource,
    metadata: JsonValue,
}

impl RoCrate {
    /// Load a crate from a resolved URI
    pub fn load(uri: &CrateUri, options: &LoaderOptions) -> Result<Self, LoaderError> {
        let base = uri.base_uri();
        let (source, metadata) = match uri {
            CrateUri::Directory(path) => load_directory(uri, path)?,
            CrateUri::LocalZip(path) => load_zip(uri, path)?,
            CrateUri::RemoteZip(url) => {
                let local = fetch::fetch_remote_zip(url, options.cache_dir.as_deref())?;
                load_zip(uri, &local)?
            }
        };
        debug!(uri = %uri, "loaded RO-Crate");
        Ok(Self {
            uri: uri.clone(),
            base,
            source,
            metadata,
        })
    }

    /// The crate URI this instance was loaded from
    pub fn uri(&self) -> &CrateUri {
        &self.uri
    }

    /// The base IRI relative `@id`s resolve against (ends with `/`)
    pub fn base_uri(&self) -> &str {
        &self.base
    }

    /// The parsed metadata document
    pub fn metadata(&self) -> &JsonValue {
        &self.metadata
    }

    /// The metadata document as an RDF graph over the crate base IRI
    pub fn metadata_graph(&self) -> Result<Graph, LoaderError> {
        jsonld::to_graph(&self.metadata, &self.base).map_err(|e| LoaderError::MetadataMalformed {
            uri: self.uri.to_string(),
            message: e.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Entity access over the raw metadata document
    // ------------------------------------------------------------------

    /// All entities in the `@graph` array
    pub fn entities(&self) -> impl Iterator<Item = &JsonValue> {
        self.metadata
            .get("@graph")
            .and_then(JsonValue::as_array)
            .map(|a| a.iter())
            .unwrap_or_default()
    }

    /// Look up an entity by its raw `@id`
    pub fn entity(&self, id: &str) -> Option<&JsonValue> {
        self.entities()
            .find(|e| e.get("@id").and_then(JsonValue::as_str) == Some(id))
    }

    /// The metadata file descriptor entity
    pub fn descriptor(&self) -> Option<&JsonValue> {
        self.entity(METADATA_FILE)
    }

    /// The root data entity (the descriptor's `about` target)
    pub fn root_entity(&self) -> Option<&JsonValue> {
        let about = self.descriptor().and_then(|d| entity_refs(d, "about").into_iter().next())?;
        self.entity(&about)
    }

    /// The raw `@id` of the root data entity (default `./`)
    pub fn root_raw_id(&self) -> String {
        self.descriptor()
            .and_then(|d| entity_refs(d, "about").into_iter().next())
            .unwrap_or_else(|| "./".to_string())
    }

    /// The resolved IRI of the root data entity
    pub fn root_id(&self) -> String {
        jsonld::resolve_iri(&self.base, &self.root_raw_id())
    }

    /// The profile URIs the crate declares conformance to
    ///
    /// Collects `conformsTo` from the root data entity first, then from the
    /// metadata file descriptor, de-duplicated in that order.
    pub fn conforms_to(&self) -> Vec<String> {
        let mut uris = Vec::new();
        if let Some(root) = self.root_entity() {
            uris.extend(entity_refs(root, "conformsTo"));
        }
        if let Some(descriptor) = self.descriptor() {
            uris.extend(entity_refs(descriptor, "conformsTo"));
        }
        let mut seen = std::collections::HashSet::new();
        uris.retain(|u| seen.insert(u.clone()));
        uris
    }

    /// The raw `@id` of the root entity's `mainEntity`, when declared
    pub fn main_workflow_id(&self) -> Option<String> {
        self.root_entity()
            .and_then(|root| entity_refs(root, "mainEntity").into_iter().next())
    }

    /// The raw `@id`s the root entity lists under `hasPart`
    pub fn has_part_ids(&self) -> Vec<String> {
        self.root_entity()
            .map(|root| entity_refs(root, "hasPart"))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Contents oracle
    // ------------------------------------------------------------------

    /// True iff the named data entity is present in the crate contents
    ///
    /// Accepts files and directories; a trailing slash is tolerated in both
    /// directions (an entity `foo` may name the directory `foo/` and vice
    /// versa). Absolute URIs are not local contents and return false.
    pub fn file_exists(&self, relative_id: &str) -> bool {
        if relative_id.contains("://") {
            return false;
        }
        let decoded = percent_decode(relative_id);
        let cleaned = decoded.trim_start_matches("./").trim_end_matches('/');
        if cleaned.is_empty() {
            // The root itself
            return true;
        }
        match &self.source {
            CrateSource::Directory { root } => {
                let path = root.join(cleaned);
                path.is_file() || path.is_dir()
            }
            CrateSource::Zip { entries } => {
                let dir_prefix = format!("{}/", cleaned);
                entries
                    .iter()
                    .any(|e| e == cleaned || e == &dir_prefix || e.starts_with(&dir_prefix))
            }
        }
    }
}

fn load_directory(
    uri: &CrateUri,
    path: &Path,
) -> Result<(CrateSource, JsonValue), LoaderError> {
    let metadata_path = path.join(METADATA_FILE);
    if !metadata_path.is_file() {
        return Err(LoaderError::MetadataMissing {
            uri: uri.to_string(),
        });
    }
    let text = std::fs::read_to_string(&metadata_path).map_err(|e| {
        LoaderError::MetadataMalformed {
            uri: uri.to_string(),
            message: e.to_string(),
        }
    })?;
    let metadata = parse_metadata(uri, &text)?;
    Ok((
        CrateSource::Directory {
            root: path.to_path_buf(),
        },
        metadata,
    ))
}

fn load_zip(uri: &CrateUri, path: &Path) -> Result<(CrateSource, JsonValue), LoaderError> {
    let file = File::open(path).map_err(|_| LoaderError::CrateNotFound {
        uri: uri.to_string(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| LoaderError::ArchiveCorrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let entries: Vec<String> = archive.file_names().map(str::to_string).collect();

    if !entries.iter().any(|e| e == METADATA_FILE) {
        return Err(LoaderError::MetadataMissing {
            uri: uri.to_string(),
        });
    }

    let mut entry = archive
        .by_name(METADATA_FILE)
        .map_err(|e| LoaderError::ArchiveCorrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let mut text = String::new();
    std::io::Read::read_to_string(&mut entry, &mut text).map_err(|e| {
        LoaderError::ArchiveCorrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    let metadata = parse_metadata(uri, &text)?;

    Ok((CrateSource::Zip { entries }, metadata))
}

fn parse_metadata(uri: &CrateUri, text: &str) -> Result<JsonValue, LoaderError> {
    serde_json::from_str(text).map_err(|e| LoaderError::MetadataMalformed {
        uri: uri.to_string(),
        message: e.to_string(),
    })
}

/// The `@id` references of an entity property
///
/// Handles single objects, arrays, plain strings, and `{"@id": ...}`
/// reference objects.
pub fn entity_refs(entity: &JsonValue, property: &str) -> Vec<String> {
    let Some(value) = entity.get(property) else {
        return Vec::new();
    };
    let items: Vec<&JsonValue> = match value {
        JsonValue::Array(a) => a.iter().collect(),
        other => vec![other],
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Object(o) => o
                .get("@id")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Minimal percent-decoding for entity identifiers (`%20` and friends)
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

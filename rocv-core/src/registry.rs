//! Profile registry: discovery, descriptor parsing, and shape bookkeeping
//!
//! The registry scans layered profile directories (built-in first, user
//! extensions after, shadowing on identifier collision), parses each
//! profile's Turtle descriptor and SHACL shape files, and attaches the
//! built-in programmatic checks for the profile's token.
//!
//! Every SHACL check is given a stable shape key (an IRI) and a
//! back-reference `shape key -> (profile, requirement, check)` so the
//! executor can map validation-report entries back to check identities.

use crate::checks::builtin_requirements;
use crate::errors::ProfileError;
use crate::profile::{extract_version, split_token, version_ordinal, Profile, ProfileVersion};
use crate::requirement::{Check, CheckBody, Requirement};
use crate::severity::{levels, RequirementLevel, Severity};
use rocv_graph::{local_name, turtle, Graph, Term};
use rocv_shacl::{compile, CompiledShape};
use rocv_vocab::{dct, prof, rdfs, schema, validator};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the profile descriptor
pub const PROFILE_DESCRIPTOR_FILE: &str = "profile.ttl";

/// File name of the optional profile ontology (not a shape file)
const ONTOLOGY_FILE: &str = "ontology.ttl";

/// Identifier token of the base profile every crate falls back to
pub const BASE_PROFILE_TOKEN: &str = "ro-crate";

/// Back-reference from a shape key to its check identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRef {
    /// Owning profile identifier
    pub profile: String,
    /// Requirement identifier
    pub requirement: String,
    /// Check identifier
    pub check: String,
}

/// The loaded profile collection
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    /// Profiles by identifier (BTreeMap for deterministic iteration)
    profiles: BTreeMap<String, Profile>,
    /// Profile URI -> identifier
    by_uri: HashMap<String, String>,
    /// Shape key -> check identity
    shape_checks: HashMap<String, CheckRef>,
    /// `(profile, requirement)` -> compiled shape executed for it
    requirement_shapes: HashMap<(String, String), CompiledShape>,
}

impl ProfileRegistry {
    /// Load profiles from layered directories
    ///
    /// Later directories shadow earlier ones on identifier collision, so
    /// pass the built-in directory first and user extensions after it.
    pub fn load(paths: &[PathBuf]) -> Result<Self, ProfileError> {
        let mut registry = ProfileRegistry::default();
        for (layer, path) in paths.iter().enumerate() {
            if !path.is_dir() {
                return Err(ProfileError::ProfilesDirectoryNotFound { path: path.clone() });
            }
            let mut profile_dirs = Vec::new();
            collect_profile_dirs(path, &mut profile_dirs);
            profile_dirs.sort();
            for dir in profile_dirs {
                let loaded = load_profile(path, &dir)?;
                registry.insert(loaded, layer > 0)?;
            }
        }
        debug!(profiles = registry.profiles.len(), "profile registry loaded");
        Ok(registry)
    }

    fn insert(&mut self, loaded: LoadedProfile, allow_shadowing: bool) -> Result<(), ProfileError> {
        let identifier = loaded.profile.identifier.clone();
        let uri = loaded.profile.uri.clone();

        if self.profiles.contains_key(&identifier) {
            if !allow_shadowing {
                return Err(ProfileError::DuplicateIdentifier {
                    what: "identifier",
                    value: identifier,
                });
            }
            self.remove(&identifier);
        }
        if let Some(existing) = self.by_uri.get(&uri) {
            if existing != &identifier {
                return Err(ProfileError::DuplicateIdentifier {
                    what: "uri",
                    value: uri,
                });
            }
        }

        self.by_uri.insert(uri, identifier.clone());
        for (key, check_ref) in loaded.shape_checks {
            self.shape_checks.insert(key, check_ref);
        }
        for (req, shape) in loaded.requirement_shapes {
            self.requirement_shapes.insert((identifier.clone(), req), shape);
        }
        self.profiles.insert(identifier, loaded.profile);
        Ok(())
    }

    fn remove(&mut self, identifier: &str) {
        if let Some(old) = self.profiles.remove(identifier) {
            self.by_uri.remove(&old.uri);
            let prefix = format!("urn:rocv:{}:", identifier);
            self.shape_checks.retain(|key, _| !key.starts_with(&prefix));
            self.requirement_shapes
                .retain(|(profile, _), _| profile != identifier);
        }
    }

    /// Look up a profile by identifier
    pub fn get(&self, identifier: &str) -> Result<&Profile, ProfileError> {
        self.profiles
            .get(identifier)
            .ok_or_else(|| ProfileError::ProfileNotFound {
                identifier: identifier.to_string(),
            })
    }

    /// Look up a profile by identifier, returning None when absent
    pub fn maybe_get(&self, identifier: &str) -> Option<&Profile> {
        self.profiles.get(identifier)
    }

    /// All profiles, ordered by identifier
    pub fn all(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Look up a profile by URI
    pub fn find_by_uri(&self, uri: &str) -> Option<&Profile> {
        self.by_uri.get(uri).and_then(|id| self.profiles.get(id))
    }

    /// All registered versions of a token, lowest version first
    pub fn find_by_token(&self, token: &str) -> Vec<&Profile> {
        let mut found: Vec<&Profile> =
            self.profiles.values().filter(|p| p.token == token).collect();
        found.sort_by(|a, b| version_ordinal(&a.version).cmp(&version_ordinal(&b.version)));
        found
    }

    /// The latest registered version of a token
    pub fn latest_by_token(&self, token: &str) -> Option<&Profile> {
        self.find_by_token(token).into_iter().last()
    }

    /// The base `ro-crate` profile (latest registered version)
    pub fn base_profile(&self) -> Option<&Profile> {
        self.latest_by_token(BASE_PROFILE_TOKEN)
    }

    /// Profiles whose token appears anywhere in the crate's `conformsTo`
    pub fn find_candidates(&self, conforms_to: &[String]) -> Vec<&Profile> {
        self.profiles
            .values()
            .filter(|p| conforms_to.iter().any(|uri| uri.contains(&p.token)))
            .collect()
    }

    /// The check a shape key belongs to
    pub fn shape_check(&self, shape_key: &str) -> Option<&CheckRef> {
        self.shape_checks.get(shape_key)
    }

    /// The compiled shape executed for a requirement
    pub fn requirement_shape(&self, profile: &str, requirement: &str) -> Option<&CompiledShape> {
        self.requirement_shapes
            .get(&(profile.to_string(), requirement.to_string()))
    }
}

struct LoadedProfile {
    profile: Profile,
    shape_checks: Vec<(String, CheckRef)>,
    requirement_shapes: Vec<(String, CompiledShape)>,
}

/// Recursively find directories containing a profile descriptor
fn collect_profile_dirs(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if path.join(PROFILE_DESCRIPTOR_FILE).is_file() {
            out.push(path);
        } else {
            collect_profile_dirs(&path, out);
        }
    }
}

fn malformed(path: &Path, message: impl Into<String>) -> ProfileError {
    ProfileError::ProfileMalformed {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn load_profile(base_path: &Path, dir: &Path) -> Result<LoadedProfile, ProfileError> {
    let descriptor_path = dir.join(PROFILE_DESCRIPTOR_FILE);
    let text = std::fs::read_to_string(&descriptor_path)
        .map_err(|e| malformed(dir, format!("cannot read {}: {}", PROFILE_DESCRIPTOR_FILE, e)))?;
    let descriptor = turtle::parse(&text, None)
        .map_err(|e| malformed(dir, format!("invalid {}: {}", PROFILE_DESCRIPTOR_FILE, e)))?;

    // Exactly one prof:Profile subject
    let subjects = descriptor.subjects_of_type(prof::PROFILE);
    let profile_node = match subjects.as_slice() {
        [single] => (*single).clone(),
        [] => return Err(malformed(dir, "descriptor declares no prof:Profile")),
        _ => return Err(malformed(dir, "descriptor must declare exactly one prof:Profile")),
    };
    let uri = profile_node
        .as_iri()
        .ok_or_else(|| malformed(dir, "profile node must be an IRI"))?
        .to_string();

    let raw_token = literal(&descriptor, &profile_node, prof::HAS_TOKEN)
        .unwrap_or_else(|| token_from_path(base_path, dir));
    let (token, version) = resolve_token_version(dir, &descriptor, &profile_node, &raw_token)?;
    let identifier = Profile::make_identifier(&token, version.as_ref());

    let label = literal(&descriptor, &profile_node, rdfs::LABEL);
    let comment = literal(&descriptor, &profile_node, rdfs::COMMENT);
    let is_profile_of = iris(&descriptor, &profile_node, prof::IS_PROFILE_OF);
    let is_transitive_profile_of =
        iris(&descriptor, &profile_node, prof::IS_TRANSITIVE_PROFILE_OF);
    let overrides = severity_overrides(dir, &descriptor, &profile_node)?;

    // Programmatic requirements come first, shape requirements after; the
    // final order is severity-descending, stable within a severity band.
    let mut requirements: Vec<Requirement> = builtin_requirements(&token)
        .iter()
        .map(|r| r.to_requirement())
        .collect();

    let mut shape_checks = Vec::new();
    let mut requirement_shapes = Vec::new();
    let mut engine_error = None;

    match load_shape_requirements(dir, &uri, &identifier) {
        Ok(loaded) => {
            for loaded_req in loaded {
                requirements.push(loaded_req.requirement);
                shape_checks.extend(loaded_req.shape_checks);
                requirement_shapes.push((loaded_req.identifier.clone(), loaded_req.shape));
            }
        }
        Err(message) => {
            warn!(profile = %identifier, error = %message, "shape compilation failed");
            engine_error = Some(message);
        }
    }

    for requirement in &mut requirements {
        if let Some(severity) = overrides.get(&requirement.identifier) {
            requirement.level = level_for(*severity);
        }
    }
    requirements.sort_by_key(|r| Reverse(r.level.severity));

    Ok(LoadedProfile {
        profile: Profile {
            identifier,
            token,
            version,
            uri,
            name: label.unwrap_or_else(|| raw_token.clone()),
            description: comment,
            path: dir.to_path_buf(),
            is_profile_of,
            is_transitive_profile_of,
            requirements,
            engine_error,
        },
        shape_checks,
        requirement_shapes,
    })
}

/// The requirement level a plain severity maps to
fn level_for(severity: Severity) -> RequirementLevel {
    match severity {
        Severity::Required => levels::REQUIRED,
        Severity::Recommended => levels::RECOMMENDED,
        Severity::Optional => levels::OPTIONAL,
    }
}

fn literal(graph: &Graph, subject: &Term, predicate: &str) -> Option<String> {
    graph
        .value(subject, predicate)
        .and_then(|t| t.as_literal().map(|(v, _, _)| v.lexical()))
}

fn iris(graph: &Graph, subject: &Term, predicate: &str) -> Vec<String> {
    let mut out: Vec<String> = graph
        .objects(subject, predicate)
        .filter_map(|t| t.as_iri().map(str::to_string))
        .collect();
    out.sort();
    out.dedup();
    out
}

fn token_from_path(base_path: &Path, dir: &Path) -> String {
    dir.strip_prefix(base_path)
        .unwrap_or(dir)
        .to_string_lossy()
        .replace(['/', '\\'], "-")
}

/// Resolve the token and version from descriptor, token suffix, and URI
///
/// All declared versions must agree; disagreement is a malformed profile.
fn resolve_token_version(
    dir: &Path,
    descriptor: &Graph,
    profile_node: &Term,
    raw_token: &str,
) -> Result<(String, Option<ProfileVersion>), ProfileError> {
    let (token, token_version) = split_token(raw_token);

    let mut candidates: Vec<ProfileVersion> = Vec::new();
    for declared in [
        literal(descriptor, profile_node, schema::VERSION),
        literal(descriptor, profile_node, dct::HAS_VERSION),
    ]
    .into_iter()
    .flatten()
    {
        match declared.parse() {
            Ok(version) => candidates.push(version),
            Err(_) => {
                return Err(malformed(dir, format!("invalid declared version: {}", declared)))
            }
        }
    }
    if let Some(version) = token_version {
        candidates.push(version);
    }
    if let Some(uri) = profile_node.as_iri() {
        if let Some(version) = extract_version(uri) {
            candidates.push(version);
        }
    }

    candidates.sort();
    candidates.dedup();
    match candidates.len() {
        0 => Ok((token, None)),
        1 => Ok((token, candidates.pop())),
        _ => Err(malformed(
            dir,
            format!(
                "inconsistent versions declared: {}",
                candidates
                    .iter()
                    .map(ProfileVersion::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

/// Parse `validator:requirementSeverity` override nodes from the descriptor
fn severity_overrides(
    dir: &Path,
    descriptor: &Graph,
    profile_node: &Term,
) -> Result<HashMap<String, Severity>, ProfileError> {
    let mut overrides = HashMap::new();
    for node in descriptor.objects(profile_node, validator::REQUIREMENT_SEVERITY) {
        let requirement = literal(descriptor, node, validator::REQUIREMENT)
            .ok_or_else(|| malformed(dir, "severity override without a requirement name"))?;
        let severity_text = literal(descriptor, node, validator::SEVERITY)
            .ok_or_else(|| malformed(dir, "severity override without a severity"))?;
        let severity: Severity = severity_text
            .parse()
            .map_err(|e: String| malformed(dir, e))?;
        overrides.insert(requirement, severity);
    }
    Ok(overrides)
}

struct LoadedShapeRequirement {
    identifier: String,
    requirement: Requirement,
    shape: CompiledShape,
    shape_checks: Vec<(String, CheckRef)>,
}

/// Load every shape file of a profile directory into requirements
///
/// Any parse or compile failure poisons the profile's SHACL portion: the
/// caller records it as the profile's engine error and the executor
/// surfaces a single internal-error issue for it.
fn load_shape_requirements(
    dir: &Path,
    profile_uri: &str,
    profile_identifier: &str,
) -> Result<Vec<LoadedShapeRequirement>, String> {
    let mut files = Vec::new();
    collect_shape_files(dir, &mut files);
    files.sort();

    let mut out = Vec::new();
    for file in files {
        let level = file
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| levels::from_folder_name(&n.to_string_lossy()))
            .unwrap_or(levels::REQUIRED);

        let text = std::fs::read_to_string(&file)
            .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
        let graph = turtle::parse(&text, Some(profile_uri))
            .map_err(|e| format!("{}: {}", file.display(), e))?;
        let shapes = compile::compile(&graph).map_err(|e| format!("{}: {}", file.display(), e))?;

        for shape in shapes {
            out.push(build_shape_requirement(profile_identifier, level, shape));
        }
    }
    Ok(out)
}

fn collect_shape_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy().to_string();
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if path.is_dir() {
            collect_shape_files(&path, out);
        } else if name.ends_with(".ttl")
            && name != PROFILE_DESCRIPTOR_FILE
            && name != ONTOLOGY_FILE
        {
            out.push(path);
        }
    }
}

/// Turn one compiled node shape into a requirement with per-check keys
fn build_shape_requirement(
    profile_identifier: &str,
    level: RequirementLevel,
    mut shape: CompiledShape,
) -> LoadedShapeRequirement {
    let requirement_id = shape.name.clone();
    let mut checks = Vec::new();
    let mut shape_checks = Vec::new();
    let mut used_ids: HashMap<String, usize> = HashMap::new();

    for property in &mut shape.property_shapes {
        let raw_id = property
            .name
            .clone()
            .map(|n| slugify(&n))
            .unwrap_or_else(|| slugify(local_name(&property.path)));
        // Falling back to a stable index on identifier collision
        let id = match used_ids.get(&raw_id) {
            None => raw_id.clone(),
            Some(n) => format!("{}_{}", raw_id, n + 1),
        };
        *used_ids.entry(raw_id).or_insert(0) += 1;

        let key = shape_key(profile_identifier, &requirement_id, &id);
        property.id = Term::iri(&key);
        shape_checks.push((
            key.clone(),
            CheckRef {
                profile: profile_identifier.to_string(),
                requirement: requirement_id.clone(),
                check: id.clone(),
            },
        ));
        checks.push(Check {
            identifier: id,
            name: property.name.clone(),
            description: property.description.clone(),
            severity: property.severity.map(Severity::from_shacl),
            message: property.message.clone(),
            body: CheckBody::Shape { shape_key: key },
        });
    }

    // A node shape with its own constraints (or no property shapes at all)
    // is a check in its own right.
    if !shape.node_constraints.is_empty() || checks.is_empty() {
        let id = if checks.is_empty() {
            requirement_id.clone()
        } else {
            "node".to_string()
        };
        let key = shape_key(profile_identifier, &requirement_id, &id);
        shape.id = Term::iri(&key);
        shape_checks.push((
            key.clone(),
            CheckRef {
                profile: profile_identifier.to_string(),
                requirement: requirement_id.clone(),
                check: id.clone(),
            },
        ));
        checks.push(Check {
            identifier: id,
            name: shape.label.clone(),
            description: shape.description.clone(),
            severity: None,
            message: shape.message.clone(),
            body: CheckBody::Shape { shape_key: key },
        });
    }

    // Checks run in identifier order within their requirement
    checks.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    LoadedShapeRequirement {
        identifier: requirement_id.clone(),
        requirement: Requirement {
            identifier: requirement_id.clone(),
            name: shape.label.clone().unwrap_or_else(|| requirement_id.clone()),
            description: shape.description.clone(),
            level,
            checks,
        },
        shape,
        shape_checks,
    }
}

fn shape_key(profile: &str, requirement: &str, check: &str) -> String {
    format!("urn:rocv:{}:{}:{}", profile, requirement, check)
}

/// Lowercase, spaces to underscores: check identifiers stay shell-friendly
fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn descriptor(uri: &str, token: &str, extra: &str) -> String {
        format!(
            r#"
            @prefix prof: <http://www.w3.org/ns/dx/prof/> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            <{uri}> a prof:Profile ;
                prof:hasToken "{token}" ;
                rdfs:label "{token} profile" ;
                rdfs:comment "test profile" {extra} .
            "#
        )
    }

    const NAME_SHAPE: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix schema: <http://schema.org/> .
        @prefix ex: <http://example.org/shapes#> .
        ex:RootEntity a sh:NodeShape ;
            sh:targetClass schema:Dataset ;
            sh:property [ sh:path schema:name ; sh:minCount 1 ] .
    "#;

    fn registry_with_one(token: &str, version: &str) -> (tempfile::TempDir, ProfileRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join(token);
        write(
            &profile_dir.join(PROFILE_DESCRIPTOR_FILE),
            &descriptor(
                &format!("https://example.org/{}/{}", token, version),
                &format!("{}-{}", token, version),
                "",
            ),
        );
        write(&profile_dir.join("must/shapes.ttl"), NAME_SHAPE);
        let registry = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap();
        (dir, registry)
    }

    #[test]
    fn test_load_and_lookup() {
        let (_dir, registry) = registry_with_one("demo", "1.0");
        let profile = registry.get("demo-1.0").unwrap();
        assert_eq!(profile.token, "demo");
        assert_eq!(profile.version.as_ref().unwrap().to_string(), "1.0");
        assert_eq!(
            registry.find_by_uri("https://example.org/demo/1.0").unwrap().identifier,
            "demo-1.0"
        );
        // Identity law: get(get(id).identifier) == get(id)
        let again = registry.get(&profile.identifier).unwrap();
        assert_eq!(again.identifier, profile.identifier);
    }

    #[test]
    fn test_shape_requirement_and_back_reference() {
        let (_dir, registry) = registry_with_one("demo", "1.0");
        let profile = registry.get("demo-1.0").unwrap();
        let requirement = profile
            .requirements
            .iter()
            .find(|r| r.identifier == "RootEntity")
            .unwrap();
        assert_eq!(requirement.level.severity, Severity::Required);
        assert_eq!(requirement.checks.len(), 1);
        assert_eq!(requirement.checks[0].identifier, "name");

        let key = shape_key("demo-1.0", "RootEntity", "name");
        let check_ref = registry.shape_check(&key).unwrap();
        assert_eq!(check_ref.requirement, "RootEntity");
        assert_eq!(check_ref.check, "name");
        assert!(registry.requirement_shape("demo-1.0", "RootEntity").is_some());
    }

    #[test]
    fn test_version_from_uri_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join("demo");
        write(
            &profile_dir.join(PROFILE_DESCRIPTOR_FILE),
            &descriptor("https://example.org/demo/2.0", "demo-1.0", ""),
        );
        let err = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ProfileError::ProfileMalformed { .. }));
    }

    #[test]
    fn test_duplicate_identifier_same_layer() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            write(
                &dir.path().join(sub).join(PROFILE_DESCRIPTOR_FILE),
                &descriptor(&format!("https://example.org/{}", sub), "same-1.0", ""),
            );
        }
        let err = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn test_user_layer_shadows_builtin() {
        let builtin = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        write(
            &builtin.path().join("demo").join(PROFILE_DESCRIPTOR_FILE),
            &descriptor("https://example.org/demo/1.0", "demo-1.0", ""),
        );
        write(
            &user.path().join("demo").join(PROFILE_DESCRIPTOR_FILE),
            &descriptor("https://example.org/demo/1.0", "demo-1.0", r#"; rdfs:seeAlso "user""#),
        );
        write(&user.path().join("demo/must/shapes.ttl"), NAME_SHAPE);

        let registry = ProfileRegistry::load(&[
            builtin.path().to_path_buf(),
            user.path().to_path_buf(),
        ])
        .unwrap();
        let profile = registry.get("demo-1.0").unwrap();
        assert!(profile.path.starts_with(user.path()));
        assert!(profile.requirements.iter().any(|r| r.identifier == "RootEntity"));
    }

    #[test]
    fn test_broken_shape_file_poisons_profile_not_load() {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join("demo");
        write(
            &profile_dir.join(PROFILE_DESCRIPTOR_FILE),
            &descriptor("https://example.org/demo/1.0", "demo-1.0", ""),
        );
        write(
            &profile_dir.join("must/broken.ttl"),
            r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix schema: <http://schema.org/> .
            <https://example.org/S> a sh:NodeShape ;
                sh:targetClass schema:Dataset ;
                sh:not [ sh:class schema:Person ] .
            "#,
        );
        let registry = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap();
        let profile = registry.get("demo-1.0").unwrap();
        assert!(profile.engine_error.is_some());
    }

    #[test]
    fn test_severity_override_from_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let profile_dir = dir.path().join("demo");
        write(
            &profile_dir.join(PROFILE_DESCRIPTOR_FILE),
            &format!(
                r#"
                @prefix prof: <http://www.w3.org/ns/dx/prof/> .
                @prefix rocv: <https://w3id.org/rocv/> .
                <https://example.org/demo/1.0> a prof:Profile ;
                    prof:hasToken "demo-1.0" ;
                    rocv:requirementSeverity [
                        rocv:requirement "RootEntity" ;
                        rocv:severity "RECOMMENDED" ;
                    ] .
                "#
            ),
        );
        write(&profile_dir.join("must/shapes.ttl"), NAME_SHAPE);
        let registry = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap();
        let profile = registry.get("demo-1.0").unwrap();
        let requirement = profile
            .requirements
            .iter()
            .find(|r| r.identifier == "RootEntity")
            .unwrap();
        assert_eq!(requirement.level.severity, Severity::Recommended);
    }

    #[test]
    fn test_missing_directory() {
        let err =
            ProfileRegistry::load(&[PathBuf::from("/definitely/not/a/profiles/dir")]).unwrap_err();
        assert!(matches!(err, ProfileError::ProfilesDirectoryNotFound { .. }));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Root Data Entity"), "root_data_entity");
        assert_eq!(slugify("name"), "name");
        assert_eq!(slugify("  weird--name  "), "weird__name");
    }
}

//! Profile selection from a crate's `conformsTo` declarations
//!
//! Selection is deterministic given `(registry, conformsTo, mode)`:
//!
//! 1. An explicit profile identifier from the caller wins outright.
//! 2. Exact URI matches are collected.
//! 3. A known token at an unregistered version downgrades to the highest
//!    registered version at or below the requested one; if none is low
//!    enough, that declaration is skipped with a warning.
//! 4. With no match at all: interactive mode asks the chooser; otherwise
//!    every candidate is validated, falling back to the base `ro-crate`
//!    profile when the candidate set is empty.
//! 5. Unversioned declarations select the latest registered version.

use crate::errors::ProfileError;
use crate::profile::{extract_version, version_ordinal, Profile};
use crate::registry::ProfileRegistry;
use crate::resolve;
use tracing::debug;

/// Chooses a profile from candidates when selection is ambiguous
///
/// The CLI implements this with an interactive prompt; non-interactive
/// callers use [`NoChooser`].
pub trait ProfileChooser {
    /// Pick one of the candidates, or None to decline
    fn choose<'a>(&self, candidates: &[&'a Profile]) -> Option<&'a Profile>;
}

/// A chooser that never picks anything
pub struct NoChooser;

impl ProfileChooser for NoChooser {
    fn choose<'a>(&self, _candidates: &[&'a Profile]) -> Option<&'a Profile> {
        None
    }
}

/// The outcome of profile selection
#[derive(Debug)]
pub struct Selection<'r> {
    /// Selected profiles, ordered and de-duplicated
    pub profiles: Vec<&'r Profile>,
    /// Human-readable warnings recorded during selection
    pub warnings: Vec<String>,
    /// True when selection fell back to the base profile
    pub fallback: bool,
}

/// Select the profiles that drive validation
pub fn select_profiles<'r>(
    registry: &'r ProfileRegistry,
    conforms_to: &[String],
    explicit_identifier: Option<&str>,
    interactive: bool,
    chooser: &dyn ProfileChooser,
) -> Result<Selection<'r>, ProfileError> {
    // Explicit override: the conformsTo declarations are advisory only
    if let Some(identifier) = explicit_identifier {
        let profile = match registry.maybe_get(identifier) {
            Some(profile) => profile,
            // A bare token picks the latest registered version
            None => registry.latest_by_token(identifier).ok_or_else(|| {
                ProfileError::ProfileNotFound {
                    identifier: identifier.to_string(),
                }
            })?,
        };
        let mut warnings = Vec::new();
        if !conforms_to.iter().any(|uri| uri == &profile.uri) {
            warnings.push(format!(
                "crate does not declare conformance to the requested profile {}",
                profile.identifier
            ));
        }
        return Ok(Selection {
            profiles: vec![profile],
            warnings,
            fallback: false,
        });
    }

    let mut selected: Vec<&Profile> = Vec::new();
    let mut warnings = Vec::new();

    for uri in conforms_to {
        // Exact URI match
        if let Some(profile) = registry.find_by_uri(uri) {
            push_unique(&mut selected, profile);
            continue;
        }

        // Token match with version downgrade
        let Some(token) = matching_token(registry, uri) else {
            continue;
        };
        let versions = registry.find_by_token(&token);
        match extract_version(uri) {
            None => {
                // Unversioned request: latest registered version wins
                if let Some(profile) = versions.last() {
                    push_unique(&mut selected, profile);
                }
            }
            Some(requested) => {
                let requested_version = Some(requested.clone());
                let requested_ordinal = version_ordinal(&requested_version);
                let best = versions
                    .iter()
                    .filter(|p| version_ordinal(&p.version) <= requested_ordinal)
                    .last()
                    .copied();
                match best {
                    Some(profile) => {
                        debug!(uri = %uri, selected = %profile.identifier, "version downgrade");
                        push_unique(&mut selected, profile);
                    }
                    None => warnings.push(format!(
                        "no registered version of '{}' at or below {} (requested by {})",
                        token, requested, uri
                    )),
                }
            }
        }
    }

    if !selected.is_empty() {
        drop_selected_ancestors(registry, &mut selected);
        return Ok(Selection {
            profiles: selected,
            warnings,
            fallback: false,
        });
    }

    // No match for any conformsTo declaration
    let mut candidates = registry.find_candidates(conforms_to);
    if let Some(base) = registry.base_profile() {
        push_unique(&mut candidates, base);
    }

    if interactive {
        if let Some(chosen) = chooser.choose(&candidates) {
            return Ok(Selection {
                profiles: vec![chosen],
                warnings,
                fallback: false,
            });
        }
    }

    if candidates.is_empty() {
        let base = registry
            .base_profile()
            .ok_or_else(|| ProfileError::ProfileNotFound {
                identifier: crate::registry::BASE_PROFILE_TOKEN.to_string(),
            })?;
        warnings.push(format!(
            "no profile matches the crate's conformsTo declarations; falling back to {}",
            base.identifier
        ));
        return Ok(Selection {
            profiles: vec![base],
            warnings,
            fallback: true,
        });
    }

    // Non-interactive: validate against every candidate. The fallback flag
    // is set when candidates reduce to just the base profile.
    let fallback = candidates
        .iter()
        .all(|p| p.token == crate::registry::BASE_PROFILE_TOKEN);
    if fallback {
        warnings.push(
            "no profile matches the crate's conformsTo declarations; using the base profile"
                .to_string(),
        );
    }
    drop_selected_ancestors(registry, &mut candidates);
    Ok(Selection {
        profiles: candidates,
        warnings,
        fallback,
    })
}

fn push_unique<'r>(selected: &mut Vec<&'r Profile>, profile: &'r Profile) {
    if !selected.iter().any(|p| p.identifier == profile.identifier) {
        selected.push(profile);
    }
}

/// The registered token appearing in a conformsTo URI, longest match first
fn matching_token(registry: &ProfileRegistry, uri: &str) -> Option<String> {
    let mut tokens: Vec<&str> = registry.all().map(|p| p.token.as_str()).collect();
    tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
    tokens.dedup();
    tokens
        .into_iter()
        .find(|token| uri.contains(token))
        .map(str::to_string)
}

/// Remove profiles that are ancestors of other selected profiles
///
/// A crate declaring both the base spec and a derived profile validates
/// against the derived profile; the ancestor's requirements run anyway
/// through inheritance.
fn drop_selected_ancestors(registry: &ProfileRegistry, selected: &mut Vec<&Profile>) {
    let mut ancestor_uris = Vec::new();
    for profile in selected.iter() {
        if let Ok(chain) = resolve::resolve(registry, profile) {
            for ancestor in chain {
                if ancestor.identifier != profile.identifier {
                    ancestor_uris.push(ancestor.uri.clone());
                }
            }
        }
    }
    if selected.len() > 1 {
        selected.retain(|p| !ancestor_uris.contains(&p.uri));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PROFILE_DESCRIPTOR_FILE;
    use std::path::Path;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// ro-crate 1.1 plus workflow-ro-crate 0.5 and 1.0 (child of ro-crate)
    fn registry() -> (tempfile::TempDir, ProfileRegistry) {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("ro-crate").join(PROFILE_DESCRIPTOR_FILE),
            r#"
            @prefix prof: <http://www.w3.org/ns/dx/prof/> .
            <https://w3id.org/ro/crate/1.1> a prof:Profile ;
                prof:hasToken "ro-crate-1.1" .
            "#,
        );
        for version in ["0.5", "1.0"] {
            write(
                &dir.path()
                    .join(format!("workflow-ro-crate-{}", version))
                    .join(PROFILE_DESCRIPTOR_FILE),
                &format!(
                    r#"
                    @prefix prof: <http://www.w3.org/ns/dx/prof/> .
                    <https://w3id.org/workflowhub/workflow-ro-crate/{version}> a prof:Profile ;
                        prof:hasToken "workflow-ro-crate-{version}" ;
                        prof:isProfileOf <https://w3id.org/ro/crate/1.1> .
                    "#
                ),
            );
        }
        let registry = ProfileRegistry::load(&[dir.path().to_path_buf()]).unwrap();
        (dir, registry)
    }

    fn ids<'a>(selection: &'a Selection<'a>) -> Vec<&'a str> {
        selection.profiles.iter().map(|p| p.identifier.as_str()).collect()
    }

    #[test]
    fn test_exact_match_drops_declared_ancestor() {
        let (_dir, registry) = registry();
        let conforms = vec![
            "https://w3id.org/workflowhub/workflow-ro-crate/1.0".to_string(),
            "https://w3id.org/ro/crate/1.1".to_string(),
        ];
        let selection =
            select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        assert_eq!(ids(&selection), vec!["workflow-ro-crate-1.0"]);
        assert!(!selection.fallback);
    }

    #[test]
    fn test_version_downgrade() {
        let (_dir, registry) = registry();
        // 0.7 is unregistered: highest registered version <= 0.7 is 0.5
        let conforms = vec!["https://w3id.org/workflowhub/workflow-ro-crate/0.7".to_string()];
        let selection =
            select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        assert_eq!(ids(&selection), vec!["workflow-ro-crate-0.5"]);
    }

    #[test]
    fn test_requested_version_below_all_registered() {
        let (_dir, registry) = registry();
        // Only registered versions are 0.5 and 1.0; 0.1 is below both
        let conforms = vec!["https://w3id.org/workflowhub/workflow-ro-crate/0.1".to_string()];
        let selection =
            select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        // No direct match: the token still makes them candidates
        assert!(!selection.warnings.is_empty());
        assert!(!selection.fallback);
        assert!(!selection.profiles.is_empty());
    }

    #[test]
    fn test_unversioned_request_selects_latest() {
        let (_dir, registry) = registry();
        let conforms = vec!["https://w3id.org/workflowhub/workflow-ro-crate".to_string()];
        let selection =
            select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        assert_eq!(ids(&selection), vec!["workflow-ro-crate-1.0"]);
    }

    #[test]
    fn test_fallback_to_base() {
        let (_dir, registry) = registry();
        let conforms = vec!["https://example.org/unknown-profile/3.0".to_string()];
        let selection =
            select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        assert_eq!(ids(&selection), vec!["ro-crate-1.1"]);
        assert!(selection.fallback);
        assert!(!selection.warnings.is_empty());
    }

    #[test]
    fn test_no_conforms_to_uses_base() {
        let (_dir, registry) = registry();
        let selection = select_profiles(&registry, &[], None, false, &NoChooser).unwrap();
        assert_eq!(ids(&selection), vec!["ro-crate-1.1"]);
        assert!(selection.fallback);
    }

    #[test]
    fn test_explicit_override() {
        let (_dir, registry) = registry();
        let selection = select_profiles(
            &registry,
            &["https://w3id.org/ro/crate/1.1".to_string()],
            Some("workflow-ro-crate-0.5"),
            false,
            &NoChooser,
        )
        .unwrap();
        assert_eq!(ids(&selection), vec!["workflow-ro-crate-0.5"]);
        // The crate doesn't declare conformance to the forced profile
        assert!(!selection.warnings.is_empty());
    }

    #[test]
    fn test_explicit_override_by_token() {
        let (_dir, registry) = registry();
        let selection = select_profiles(
            &registry,
            &[],
            Some("workflow-ro-crate"),
            false,
            &NoChooser,
        )
        .unwrap();
        assert_eq!(ids(&selection), vec!["workflow-ro-crate-1.0"]);
    }

    #[test]
    fn test_explicit_override_unknown() {
        let (_dir, registry) = registry();
        let err =
            select_profiles(&registry, &[], Some("nope"), false, &NoChooser).unwrap_err();
        assert!(matches!(err, ProfileError::ProfileNotFound { .. }));
    }

    struct PickFirst;
    impl ProfileChooser for PickFirst {
        fn choose<'a>(&self, candidates: &[&'a Profile]) -> Option<&'a Profile> {
            candidates.first().copied()
        }
    }

    #[test]
    fn test_interactive_chooser() {
        let (_dir, registry) = registry();
        let conforms = vec!["https://example.org/unknown/1.0".to_string()];
        let selection =
            select_profiles(&registry, &conforms, None, true, &PickFirst).unwrap();
        assert_eq!(selection.profiles.len(), 1);
        assert!(!selection.fallback);
    }

    #[test]
    fn test_selection_deterministic() {
        let (_dir, registry) = registry();
        let conforms = vec!["https://w3id.org/workflowhub/workflow-ro-crate/1.0".to_string()];
        let a = select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        let b = select_profiles(&registry, &conforms, None, false, &NoChooser).unwrap();
        assert_eq!(ids(&a), ids(&b));
    }
}

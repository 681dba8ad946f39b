//! Profile inheritance resolution
//!
//! Parent pointers are by profile URI, resolved through the registry on
//! demand: no profile holds a direct handle to another, which keeps cycles
//! detectable at resolution time.

use crate::errors::ProfileError;
use crate::profile::Profile;
use crate::registry::ProfileRegistry;
use crate::requirement::Requirement;
use std::collections::HashMap;
use tracing::debug;

/// The transitive inheritance chain of a profile, base-first
///
/// The profile itself is the last element. When the profile declares
/// `isTransitiveProfileOf`, that declared closure wins; otherwise the
/// closure is computed by a deterministic depth-first traversal of
/// `isProfileOf`. Parent URIs not present in the registry are skipped.
pub fn resolve<'r>(
    registry: &'r ProfileRegistry,
    profile: &Profile,
) -> Result<Vec<&'r Profile>, ProfileError> {
    let mut chain: Vec<&Profile> = Vec::new();

    if !profile.is_transitive_profile_of.is_empty() {
        for uri in &profile.is_transitive_profile_of {
            if let Some(parent) = registry.find_by_uri(uri) {
                if !chain.iter().any(|p| p.identifier == parent.identifier) {
                    chain.push(parent);
                }
            }
        }
    } else {
        let mut in_progress = Vec::new();
        visit(registry, profile, &mut chain, &mut in_progress)?;
    }

    // The target profile executes last
    chain.retain(|p| p.identifier != profile.identifier);
    if let Some(own) = registry.maybe_get(&profile.identifier) {
        chain.push(own);
    }
    debug!(
        profile = %profile.identifier,
        chain = ?chain.iter().map(|p| p.identifier.as_str()).collect::<Vec<_>>(),
        "resolved inheritance chain"
    );
    Ok(chain)
}

fn visit<'r>(
    registry: &'r ProfileRegistry,
    profile: &Profile,
    chain: &mut Vec<&'r Profile>,
    in_progress: &mut Vec<String>,
) -> Result<(), ProfileError> {
    if in_progress.iter().any(|id| id == &profile.identifier) {
        return Err(ProfileError::ProfileCycle {
            identifier: profile.identifier.clone(),
        });
    }
    in_progress.push(profile.identifier.clone());

    // Sorted parent URIs keep the traversal deterministic
    let mut parents = profile.is_profile_of.clone();
    parents.sort();
    for uri in parents {
        if let Some(parent) = registry.find_by_uri(&uri) {
            visit(registry, parent, chain, in_progress)?;
            if !chain.iter().any(|p| p.identifier == parent.identifier) {
                chain.push(parent);
            }
        }
    }

    in_progress.pop();
    Ok(())
}

/// The effective requirement list of an inheritance chain
///
/// Base-first concatenation; a requirement in a descendant with the same
/// identifier replaces the inherited one in place.
pub fn effective_requirements<'r>(
    chain: &[&'r Profile],
) -> Vec<(&'r Profile, &'r Requirement)> {
    let mut out: Vec<(&Profile, &Requirement)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for profile in chain {
        for requirement in &profile.requirements {
            match positions.get(requirement.identifier.as_str()) {
                Some(&index) => {
                    out[index] = (profile, requirement);
                }
                None => {
                    positions.insert(requirement.identifier.as_str(), out.len());
                    out.push((profile, requirement));
                }
            }
        }
    }
    out
}

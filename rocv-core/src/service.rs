//! Engine entry points
//!
//! `validate` is the single call the CLI (or any other consumer) makes:
//! it builds everything from a settings value and returns the result,
//! streaming lifecycle events to the supplied subscribers along the way.

use crate::errors::Result;
use crate::events::{Publisher, Subscriber};
use crate::executor::Executor;
use crate::registry::ProfileRegistry;
use crate::result::ValidationResult;
use crate::rocrate::{LoaderOptions, RoCrate};
use crate::select::{select_profiles, NoChooser, ProfileChooser};
use crate::settings::ValidationSettings;
use crate::uri::CrateUri;
use tracing::info;

/// Validate a crate with the given settings
///
/// Drives Loader -> Selector -> Resolver -> Executor -> Result. Loader and
/// profile errors abort with no result; conformance findings are always
/// surfaced through the returned [`ValidationResult`].
pub fn validate(
    settings: &ValidationSettings,
    subscribers: Vec<Box<dyn Subscriber>>,
    chooser: &dyn ProfileChooser,
) -> Result<ValidationResult> {
    let uri: CrateUri = settings.rocrate_uri.parse()?;
    let loader_options = LoaderOptions {
        cache_dir: settings.http_cache_dir.clone(),
    };
    let rocrate = RoCrate::load(&uri, &loader_options)?;
    let registry = ProfileRegistry::load(&settings.profiles_paths)?;

    let conforms_to = rocrate.conforms_to();
    let selection = select_profiles(
        &registry,
        &conforms_to,
        settings.profile_identifier.as_deref(),
        settings.interactive,
        chooser,
    )?;
    info!(
        crate_uri = %settings.rocrate_uri,
        profiles = ?selection.profiles.iter().map(|p| p.identifier.as_str()).collect::<Vec<_>>(),
        "starting validation"
    );

    let mut publisher = Publisher::new(subscribers);
    let executor = Executor::new(&registry);
    executor.execute(&rocrate, &selection, settings, &mut publisher)
}

/// Validate without subscribers or an interactive chooser
pub fn validate_simple(settings: &ValidationSettings) -> Result<ValidationResult> {
    validate(settings, Vec::new(), &NoChooser)
}

/// Summary of a profile for discovery surfaces
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileInfo {
    /// Stable identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Profile URI
    pub uri: String,
    /// Human description
    pub description: Option<String>,
    /// Number of requirements
    pub requirement_count: usize,
}

/// The profiles a crate's `conformsTo` declarations select
///
/// Performs loading and selection but no execution; used by discovery
/// commands.
pub fn detect_profiles(settings: &ValidationSettings) -> Result<Vec<ProfileInfo>> {
    let uri: CrateUri = settings.rocrate_uri.parse()?;
    let loader_options = LoaderOptions {
        cache_dir: settings.http_cache_dir.clone(),
    };
    let rocrate = RoCrate::load(&uri, &loader_options)?;
    let registry = ProfileRegistry::load(&settings.profiles_paths)?;
    let selection = select_profiles(
        &registry,
        &rocrate.conforms_to(),
        settings.profile_identifier.as_deref(),
        false,
        &NoChooser,
    )?;
    Ok(selection.profiles.iter().map(|p| profile_info(p)).collect())
}

/// All registered profiles, for listing surfaces
pub fn list_profiles(settings: &ValidationSettings) -> Result<Vec<ProfileInfo>> {
    let registry = ProfileRegistry::load(&settings.profiles_paths)?;
    Ok(registry.all().map(profile_info).collect())
}

fn profile_info(profile: &crate::profile::Profile) -> ProfileInfo {
    ProfileInfo {
        identifier: profile.identifier.clone(),
        name: profile.name.clone(),
        uri: profile.uri.clone(),
        description: profile.description.clone(),
        requirement_count: profile.requirements.len(),
    }
}

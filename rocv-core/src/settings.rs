//! Validation settings

use crate::severity::Severity;
use std::path::PathBuf;

/// The built-in profiles directory
///
/// Resolution order: the `ROCV_PROFILES` environment variable, then the
/// `profiles/` directory shipped next to the workspace (development and
/// test builds).
pub fn default_profiles_path() -> PathBuf {
    if let Ok(path) = std::env::var("ROCV_PROFILES") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("profiles")
}

/// Configuration of one validation run
#[derive(Debug, Clone)]
pub struct ValidationSettings {
    /// Crate location: path, `file://` URI, or `http(s)` URL (required)
    pub rocrate_uri: String,
    /// Force a specific profile identifier; `None` = auto-detect
    pub profile_identifier: Option<String>,
    /// Minimum severity to execute (default REQUIRED)
    pub requirement_severity: Severity,
    /// Permit interactive profile selection (default false)
    pub interactive: bool,
    /// Layered profile directories, built-ins first
    pub profiles_paths: Vec<PathBuf>,
    /// Include parent profiles in execution (default true)
    pub inherit_profiles: bool,
    /// Stop after the first issue at or above the threshold (default false)
    pub abort_on_first: bool,
    /// Download cache directory for remote crates
    pub http_cache_dir: Option<PathBuf>,
}

impl ValidationSettings {
    /// Settings with defaults for everything but the crate URI
    pub fn new(rocrate_uri: impl Into<String>) -> Self {
        Self {
            rocrate_uri: rocrate_uri.into(),
            profile_identifier: None,
            requirement_severity: Severity::Required,
            interactive: false,
            profiles_paths: vec![default_profiles_path()],
            inherit_profiles: true,
            abort_on_first: false,
            http_cache_dir: None,
        }
    }
}

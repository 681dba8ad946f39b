//! Profile model and version ordering

use crate::requirement::Requirement;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A dotted numeric profile version (`1`, `1.0`, `1.0.2`)
///
/// Versions for the same token form a totally ordered sequence. A profile
/// without a version is treated as "latest": see [`version_ordinal`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileVersion(Vec<u32>);

impl ProfileVersion {
    /// The numeric components
    pub fn parts(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for ProfileVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Result<Vec<u32>, _> = s.split('.').map(str::parse).collect();
        match parts {
            Ok(parts) if !parts.is_empty() && parts.len() <= 3 => Ok(ProfileVersion(parts)),
            _ => Err(format!("invalid profile version: {}", s)),
        }
    }
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", text.join("."))
    }
}

// Numeric, component-wise ordering: 1.2 < 1.10
impl PartialOrd for ProfileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProfileVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Ordinal used for "highest version wins" comparisons
///
/// `None` (unversioned) sorts above every concrete version, i.e. an
/// unversioned profile is always "latest".
pub fn version_ordinal(version: &Option<ProfileVersion>) -> (bool, &[u32]) {
    match version {
        None => (true, &[]),
        Some(v) => (false, v.parts()),
    }
}

static TOKEN_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>.+?)[-_]v?(?P<version>\d+(?:\.\d+){0,2})$").unwrap());

/// Split an identifier token into `(name, version)`
///
/// Matches `<name>(-<major>(.<minor>(.<patch>)?)?)?`; tokens without a
/// trailing numeric suffix are unversioned.
pub fn split_token(token: &str) -> (String, Option<ProfileVersion>) {
    if let Some(captures) = TOKEN_VERSION_RE.captures(token) {
        let name = captures["name"].to_string();
        if let Ok(version) = captures["version"].parse() {
            return (name, Some(version));
        }
    }
    (token.to_string(), None)
}

/// Extract a trailing version from an arbitrary string (URI or token)
pub fn extract_version(text: &str) -> Option<ProfileVersion> {
    static TAIL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[/\-_]v?(\d+(?:\.\d+){0,2})/?$").unwrap());
    TAIL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A named, versioned collection of requirements
#[derive(Debug, Clone)]
pub struct Profile {
    /// Stable identifier: `<token>` or `<token>-<version>`
    pub identifier: String,
    /// Identifier token (e.g. `workflow-ro-crate`)
    pub token: String,
    /// Version suffix, when present
    pub version: Option<ProfileVersion>,
    /// Profile URI, unique across the registry
    pub uri: String,
    /// Display name (rdfs:label, falling back to the identifier)
    pub name: String,
    /// Human description (rdfs:comment)
    pub description: Option<String>,
    /// The profile directory on disk
    pub path: PathBuf,
    /// Direct parent profile URIs (prof:isProfileOf)
    pub is_profile_of: Vec<String>,
    /// Full transitive parent URIs when declared (prof:isTransitiveProfileOf)
    pub is_transitive_profile_of: Vec<String>,
    /// The ordered requirement list
    pub requirements: Vec<Requirement>,
    /// Shape compilation failure, surfaced as a per-profile engine error at
    /// execution time rather than a load error
    pub engine_error: Option<String>,
}

impl Profile {
    /// Build the identifier for a token/version pair
    pub fn make_identifier(token: &str, version: Option<&ProfileVersion>) -> String {
        match version {
            Some(v) => format!("{}-{}", token, v),
            None => token.to_string(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse_and_order() {
        let v1: ProfileVersion = "1.0".parse().unwrap();
        let v2: ProfileVersion = "1.1".parse().unwrap();
        let v10: ProfileVersion = "1.10".parse().unwrap();
        assert!(v1 < v2);
        assert!(v2 < v10);
        assert_eq!(v1.to_string(), "1.0");
        assert!("".parse::<ProfileVersion>().is_err());
        assert!("1.2.3.4".parse::<ProfileVersion>().is_err());
        assert!("one".parse::<ProfileVersion>().is_err());
    }

    #[test]
    fn test_split_token() {
        let (name, version) = split_token("workflow-ro-crate-1.0");
        assert_eq!(name, "workflow-ro-crate");
        assert_eq!(version.unwrap().to_string(), "1.0");

        let (name, version) = split_token("ro-crate");
        assert_eq!(name, "ro-crate");
        assert!(version.is_none());

        let (name, version) = split_token("process-run-crate-0.5");
        assert_eq!(name, "process-run-crate");
        assert_eq!(version.unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_extract_version_from_uri() {
        assert_eq!(
            extract_version("https://w3id.org/workflowhub/workflow-ro-crate/1.0")
                .unwrap()
                .to_string(),
            "1.0"
        );
        assert_eq!(
            extract_version("https://w3id.org/ro/crate/1.1").unwrap().to_string(),
            "1.1"
        );
        assert!(extract_version("https://example.org/profile").is_none());
    }

    #[test]
    fn test_unversioned_is_latest() {
        let concrete = Some("9.9.9".parse().unwrap());
        let unversioned: Option<ProfileVersion> = None;
        assert!(version_ordinal(&unversioned) > version_ordinal(&concrete));
    }

    #[test]
    fn test_make_identifier() {
        assert_eq!(
            Profile::make_identifier("ro-crate", Some(&"1.1".parse().unwrap())),
            "ro-crate-1.1"
        );
        assert_eq!(Profile::make_identifier("ro-crate", None), "ro-crate");
    }
}

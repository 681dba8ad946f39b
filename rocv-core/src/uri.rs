//! Crate URI parsing
//!
//! A crate location is one of three shapes: a local directory, a local
//! `.zip` archive (plain path or `file://` URI), or a remote `http(s)`
//! URL pointing at a zip.

use crate::errors::LoaderError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A resolved crate location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrateUri {
    /// Local directory crate root
    Directory(PathBuf),
    /// Local zip archive
    LocalZip(PathBuf),
    /// Remote zip archive (http or https)
    RemoteZip(String),
}

impl CrateUri {
    /// The base IRI relative entity `@id`s resolve against
    ///
    /// Always ends with `/`. Local crates use a `file://` IRI of the
    /// directory (or archive path); remote crates use the URL itself.
    pub fn base_uri(&self) -> String {
        match self {
            CrateUri::Directory(path) | CrateUri::LocalZip(path) => {
                let absolute = absolutize(path);
                let text = absolute.to_string_lossy().replace('\\', "/");
                format!("file://{}/", text.trim_end_matches('/'))
            }
            CrateUri::RemoteZip(url) => format!("{}/", url.trim_end_matches('/')),
        }
    }

    /// True for the two local variants
    pub fn is_local(&self) -> bool {
        !matches!(self, CrateUri::RemoteZip(_))
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn from_local_path(raw: &str, path: &Path) -> Result<CrateUri, LoaderError> {
    if path.is_dir() {
        return Ok(CrateUri::Directory(path.to_path_buf()));
    }
    if path.is_file() {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
            return Ok(CrateUri::LocalZip(path.to_path_buf()));
        }
        return Err(LoaderError::UnsupportedScheme {
            uri: raw.to_string(),
        });
    }
    Err(LoaderError::CrateNotFound {
        uri: raw.to_string(),
    })
}

impl FromStr for CrateUri {
    type Err = LoaderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoaderError::CrateNotFound {
                uri: raw.to_string(),
            });
        }
        if let Some(rest) = trimmed.strip_prefix("file://") {
            return from_local_path(trimmed, Path::new(rest));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(CrateUri::RemoteZip(trimmed.to_string()));
        }
        if let Some((scheme, _)) = trimmed.split_once("://") {
            let _ = scheme;
            return Err(LoaderError::UnsupportedScheme {
                uri: raw.to_string(),
            });
        }
        from_local_path(trimmed, Path::new(trimmed))
    }
}

impl fmt::Display for CrateUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrateUri::Directory(path) | CrateUri::LocalZip(path) => {
                write!(f, "{}", path.display())
            }
            CrateUri::RemoteZip(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uri: CrateUri = dir.path().to_string_lossy().parse().unwrap();
        assert!(matches!(uri, CrateUri::Directory(_)));
        assert!(uri.base_uri().starts_with("file://"));
        assert!(uri.base_uri().ends_with('/'));
    }

    #[test]
    fn test_parse_zip() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("crate.zip");
        std::fs::write(&zip_path, b"PK").unwrap();
        let uri: CrateUri = zip_path.to_string_lossy().parse().unwrap();
        assert!(matches!(uri, CrateUri::LocalZip(_)));
    }

    #[test]
    fn test_parse_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("file://{}", dir.path().display());
        let uri: CrateUri = raw.parse().unwrap();
        assert!(matches!(uri, CrateUri::Directory(_)));
    }

    #[test]
    fn test_parse_remote() {
        let uri: CrateUri = "https://example.org/crates/demo.zip".parse().unwrap();
        assert_eq!(
            uri,
            CrateUri::RemoteZip("https://example.org/crates/demo.zip".to_string())
        );
        assert_eq!(uri.base_uri(), "https://example.org/crates/demo.zip/");
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = "ftp://example.org/x.zip".parse::<CrateUri>().unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_missing_path() {
        let err = "/definitely/not/here".parse::<CrateUri>().unwrap_err();
        assert!(matches!(err, LoaderError::CrateNotFound { .. }));
    }

    #[test]
    fn test_non_zip_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = file.to_string_lossy().parse::<CrateUri>().unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedScheme { .. }));
    }
}

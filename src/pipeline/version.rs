//! Project version tracking.
//!
//! The version lives in a plain text file inside the project (by default
//! `Assets/version.txt`). It is read once at startup, and every change is
//! written back immediately.

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Version written when no version file exists yet.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next minor version. The patch component resets to zero.
    pub const fn bump_minor(self) -> Self {
        Self::new(self.major, self.minor + 1, 0)
    }

    /// Next patch version.
    pub const fn bump_patch(self) -> Self {
        Self::new(self.major, self.minor, self.patch + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let format_error = |reason: String| Error::FormatError {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(format_error(format!(
                "expected 3 components, found {}",
                parts.len()
            )));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            // u64::from_str accepts a leading '+', which is not a version digit
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format_error(format!("{part:?} is not a non-negative integer")));
            }
            *slot = part
                .parse()
                .map_err(|e| format_error(format!("{part:?}: {e}")))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// File-backed version storage.
///
/// Tracks the last value written so callers can persist free-text edits with
/// [`VersionStore::persist_if_changed`].
#[derive(Debug)]
pub struct VersionStore {
    path: PathBuf,
    persisted: Option<String>,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            persisted: None,
        }
    }

    /// Path of the version file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored version text, creating the file with
    /// [`DEFAULT_VERSION`] if it does not exist.
    pub async fn load(&mut self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                let text = text.trim().to_string();
                log::debug!("Loaded version {} from {}", text, self.path.display());
                self.persisted = Some(text.clone());
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No version file at {}, starting at {}",
                    self.path.display(),
                    DEFAULT_VERSION
                );
                self.save(DEFAULT_VERSION).await?;
                Ok(DEFAULT_VERSION.to_string())
            }
            Err(e) => Err(Error::Fs {
                context: "reading version file",
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Rewrites the version file with `version`.
    pub async fn save(&mut self, version: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating version file directory", parent)?;
        }
        tokio::fs::write(&self.path, version)
            .await
            .fs_context("writing version file", &self.path)?;
        self.persisted = Some(version.to_string());
        Ok(())
    }

    /// Saves `live` if it differs from what was last loaded or saved.
    ///
    /// Returns whether a write happened.
    pub async fn persist_if_changed(&mut self, live: &str) -> Result<bool> {
        if self.persisted.as_deref() == Some(live) {
            return Ok(false);
        }
        self.save(live).await?;
        Ok(true)
    }

    /// Parses `current`, bumps the minor component and saves the result.
    pub async fn increment_minor(&mut self, current: &str) -> Result<Version> {
        let next = current.parse::<Version>()?.bump_minor();
        self.save(&next.to_string()).await?;
        log::info!("Version {} -> {}", current, next);
        Ok(next)
    }

    /// Parses `current`, bumps the patch component and saves the result.
    pub async fn increment_patch(&mut self, current: &str) -> Result<Version> {
        let next = current.parse::<Version>()?.bump_patch();
        self.save(&next.to_string()).await?;
        log::info!("Version {} -> {}", current, next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_triplet() {
        assert_eq!("1.2.3".parse::<Version>().unwrap(), Version::new(1, 2, 3));
        assert_eq!("0.10.07".parse::<Version>().unwrap(), Version::new(0, 10, 7));
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["", "1", "1.2", "1.2.3.4", "1.x.3", "1..3", "-1.2.3", "+1.2.3", "1.2.3-beta", " 1.2.3"] {
            let err = bad.parse::<Version>().unwrap_err();
            assert!(matches!(err, Error::FormatError { .. }), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn minor_bump_resets_patch() {
        assert_eq!(Version::new(1, 2, 3).bump_minor().to_string(), "1.3.0");
        assert_eq!(Version::new(1, 2, 3).bump_patch().to_string(), "1.2.4");
    }

    #[tokio::test]
    async fn load_initializes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assets").join("version.txt");
        let mut store = VersionStore::new(&path);

        assert_eq!(store.load().await.unwrap(), DEFAULT_VERSION);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_VERSION);
    }

    #[tokio::test]
    async fn load_trims_stored_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "2.0.1\n").unwrap();

        let mut store = VersionStore::new(&path);
        assert_eq!(store.load().await.unwrap(), "2.0.1");
    }

    #[tokio::test]
    async fn increments_persist_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        let mut store = VersionStore::new(&path);

        let v = store.increment_minor("1.2.3").await.unwrap();
        assert_eq!(v.to_string(), "1.3.0");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.3.0");

        let v = store.increment_patch(&v.to_string()).await.unwrap();
        assert_eq!(v.to_string(), "1.3.1");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.3.1");
    }

    #[tokio::test]
    async fn failed_increment_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "release-one").unwrap();

        let mut store = VersionStore::new(&path);
        let live = store.load().await.unwrap();

        assert!(matches!(
            store.increment_minor(&live).await,
            Err(Error::FormatError { .. })
        ));
        assert!(matches!(
            store.increment_patch(&live).await,
            Err(Error::FormatError { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "release-one");
    }

    #[tokio::test]
    async fn persist_if_changed_only_writes_on_difference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        let mut store = VersionStore::new(&path);
        store.load().await.unwrap();

        assert!(!store.persist_if_changed(DEFAULT_VERSION).await.unwrap());
        assert!(store.persist_if_changed("0.2.0").await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0.2.0");
        assert!(!store.persist_if_changed("0.2.0").await.unwrap());
    }
}

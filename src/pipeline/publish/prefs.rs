//! Per-user preference storage.
//!
//! A flat string key/value map persisted as JSON. The default location is
//! `{config_dir}/publish-matrix/preferences.json`.

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Preference key holding the uploader executable path.
pub const BUTLER_PATH_KEY: &str = "ButlerPath";

/// File-backed key/value preferences.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Default preferences file for the current user.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("publish-matrix").join("preferences.json"))
            .ok_or_else(|| Error::ConfigError("could not determine user config directory".into()))
    }

    /// Loads preferences from `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                Error::ConfigError(format!("invalid preferences file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e).fs_context("reading preferences", &path),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Sets `key` and writes the file.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.save()
    }

    /// Removes `key` and writes the file. Returns the previous value.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>> {
        let previous = self.values.remove(key);
        self.save()?;
        Ok(previous)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).fs_context("creating preferences directory", parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| Error::GenericError(format!("serializing preferences: {e}")))?;
        std::fs::write(&self.path, json).fs_context("writing preferences", &self.path)
    }
}

//! Artifact packaging.
//!
//! Turns a platform's build output directory into a zip artifact and keeps a
//! versioned copy of every artifact in the versions directory.
//!
//! # Layout
//!
//! ```text
//! Builds/
//! ├── Grib_Windows/            build output (source)
//! ├── Grib_Windows.zip         artifact that gets uploaded
//! └── _versions/
//!     └── Grib_Windows_1.2.3.zip
//! ```

mod archive;
mod checksum;

pub use archive::is_excluded;
pub use checksum::calculate_sha256;

use crate::pipeline::{
    error::{Error, ErrorExt, Result},
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// What an artifact is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadata {
    /// Upload channel (e.g. `windows`).
    pub channel: String,
    /// Version string the artifact was built at.
    pub version: String,
    /// Platform label used in the versioned file name (e.g. `Windows`).
    pub platform_label: String,
}

/// A packaged build.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Archive that gets uploaded.
    pub path: PathBuf,
    /// Copy stored under its canonical versioned name.
    pub versioned_path: PathBuf,
    pub metadata: ArtifactMetadata,
    /// Number of files in the archive.
    pub entries: usize,
    /// Archive size in bytes.
    pub size: u64,
    /// Hex SHA-256 of the archive.
    pub checksum: String,
}

impl Artifact {
    /// Canonical versioned file name: `{game}_{label}_{version}.zip`.
    pub fn canonical_file_name(game: &str, metadata: &ArtifactMetadata) -> String {
        format!(
            "{}_{}_{}.zip",
            game, metadata.platform_label, metadata.version
        )
    }
}

/// Zips build outputs and stores versioned copies.
#[derive(Debug, Clone)]
pub struct ArtifactPackager {
    game: String,
    markers: Vec<String>,
    versions_dir: PathBuf,
}

impl ArtifactPackager {
    /// Packager using the game name, exclusion markers and versions
    /// directory from `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self {
            game: settings.game().to_string(),
            markers: settings.excluded_markers(),
            versions_dir: settings.versions_dir().to_path_buf(),
        }
    }

    /// Zips `source_dir` into `destination` and writes the versioned copy.
    ///
    /// A missing `source_dir` is created empty and packaged as an empty
    /// archive. Existing files at `destination` and at the versioned path are
    /// replaced.
    pub async fn package(
        &self,
        source_dir: &Path,
        destination: &Path,
        metadata: ArtifactMetadata,
    ) -> Result<Artifact> {
        let exists = tokio::fs::try_exists(source_dir)
            .await
            .fs_context("inspecting build output", source_dir)?;
        if !exists {
            log::warn!(
                "Build output {} does not exist, packaging an empty directory",
                source_dir.display()
            );
            fs::create_dir_all(source_dir, false).await?;
        }

        fs::remove_file_if_exists(destination).await?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent, false).await?;
        }

        let entries = {
            let source_dir = source_dir.to_path_buf();
            let destination = destination.to_path_buf();
            let markers = self.markers.clone();
            tokio::task::spawn_blocking(move || {
                archive::write_zip(&source_dir, &destination, &markers)
            })
            .await
            .map_err(|e| Error::GenericError(format!("Archive task panicked: {e}")))??
        };
        log::info!(
            "Created zip file at {} ({} entries)",
            destination.display(),
            entries
        );

        let versioned_path = self
            .versions_dir
            .join(Artifact::canonical_file_name(&self.game, &metadata));
        fs::replace_file(destination, &versioned_path).await?;
        log::info!("Versioned ZIP file saved to: {}", versioned_path.display());

        let size = tokio::fs::metadata(destination)
            .await
            .fs_context("reading artifact metadata", destination)?
            .len();
        let checksum = calculate_sha256(destination).await?;

        Ok(Artifact {
            path: destination.to_path_buf(),
            versioned_path,
            metadata,
            entries,
            size,
            checksum,
        })
    }
}

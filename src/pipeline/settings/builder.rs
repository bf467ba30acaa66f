//! Builder for constructing Settings.

use super::Settings;
use std::path::{Path, PathBuf};

/// Name of the folder, under the builds directory, holding versioned copies.
pub const VERSIONS_DIR_NAME: &str = "_versions";

/// Builder for constructing [`Settings`].
///
/// # See Also
///
/// - [`Settings`] - The built settings struct
#[derive(Default, Debug)]
pub struct SettingsBuilder {
    game: Option<String>,
    organization: Option<String>,
    builds_dir: Option<PathBuf>,
    versions_dir: Option<PathBuf>,
    scenes: Vec<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the game name.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    /// Sets the organization (itch.io account) name.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Sets the root folder for platform builds.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn builds_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builds_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the folder for versioned artifact copies.
    ///
    /// Default: `{builds_dir}/_versions`
    pub fn versions_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.versions_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the ordered scene list passed to the build backend.
    ///
    /// Default: empty
    pub fn scenes(mut self, scenes: Vec<String>) -> Self {
        self.scenes = scenes;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `game`, `organization` or `builds_dir` is missing,
    /// or if the game name is blank.
    pub fn build(self) -> crate::pipeline::Result<Settings> {
        use crate::pipeline::error::Context;

        let game = self.game.context("game name is required")?;
        if game.trim().is_empty() {
            crate::bail!("game name must not be empty");
        }
        let organization = self.organization.context("organization is required")?;
        let builds_dir = self.builds_dir.context("builds_dir is required")?;
        let versions_dir = self
            .versions_dir
            .unwrap_or_else(|| builds_dir.join(VERSIONS_DIR_NAME));

        Ok(Settings::new(
            game,
            organization,
            builds_dir,
            versions_dir,
            self.scenes,
        ))
    }
}

//! Core Settings struct and implementations.

use std::path::{Path, PathBuf};

/// Shared settings for every stage of a run.
///
/// # Examples
///
/// ```no_run
/// use publish_matrix::pipeline::SettingsBuilder;
///
/// # fn example() -> publish_matrix::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .game("Cool Game")
///     .organization("My Org")
///     .builds_dir("Builds")
///     .build()?;
///
/// assert_eq!(settings.upload_target("windows"), "my-org/cool-game:windows");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Product name, used in output and artifact file names.
    game: String,

    /// Publishing account or organization.
    organization: String,

    /// Root folder receiving one output directory per platform.
    builds_dir: PathBuf,

    /// Folder receiving the versioned artifact copies.
    versions_dir: PathBuf,

    /// Ordered scene list handed to the build backend.
    scenes: Vec<String>,
}

impl Settings {
    /// Returns the game name as configured.
    pub fn game(&self) -> &str {
        &self.game
    }

    /// Returns the organization name as configured.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn builds_dir(&self) -> &Path {
        &self.builds_dir
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    /// Folder markers that must never ship inside an archive.
    ///
    /// These are the backup and debug-symbol folders engines place next to a
    /// player build.
    pub fn excluded_markers(&self) -> Vec<String> {
        vec![
            format!("{}_BackUpThisFolder_ButDontShipItWithYourGame", self.game),
            format!("{}_BurstDebugInformation_DoNotShip", self.game),
        ]
    }

    /// Destination identifier `org/game:channel` for the uploader.
    pub fn upload_target(&self, channel: &str) -> String {
        format!(
            "{}/{}:{}",
            slugify(&self.organization),
            slugify(&self.game),
            channel
        )
    }

    /// Public page of the game on itch.io.
    pub fn game_url(&self) -> String {
        slugify(&format!(
            "https://{}.itch.io/{}",
            self.organization, self.game
        ))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        game: String,
        organization: String,
        builds_dir: PathBuf,
        versions_dir: PathBuf,
        scenes: Vec<String>,
    ) -> Self {
        Self {
            game,
            organization,
            builds_dir,
            versions_dir,
            scenes,
        }
    }
}

/// Lower-cases `input` and replaces spaces with hyphens.
pub fn slugify(input: &str) -> String {
    input.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::super::SettingsBuilder;
    use super::*;

    fn settings() -> Settings {
        SettingsBuilder::new()
            .game("Cool Game")
            .organization("My Org")
            .builds_dir("/tmp/Builds")
            .build()
            .unwrap()
    }

    #[test]
    fn upload_target_is_normalized() {
        assert_eq!(settings().upload_target("windows"), "my-org/cool-game:windows");
    }

    #[test]
    fn game_url_is_normalized() {
        assert_eq!(settings().game_url(), "https://my-org.itch.io/cool-game");
    }

    #[test]
    fn markers_use_raw_game_name() {
        let markers = settings().excluded_markers();
        assert_eq!(
            markers,
            vec![
                "Cool Game_BackUpThisFolder_ButDontShipItWithYourGame".to_string(),
                "Cool Game_BurstDebugInformation_DoNotShip".to_string(),
            ]
        );
    }
}

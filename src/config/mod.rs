//! Project configuration from `publish.toml`.
//!
//! Every section is optional. A project without the file still builds
//! Windows with the default engine command, using the project directory
//! name as game and organization.

use crate::error::{AppError, CliError, Result};
use crate::pipeline::{
    BackendVariant, BuildTargetConfig, CommandBackend, Platform, Settings, SettingsBuilder,
    BUTLER_PATH_ENV,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "publish.toml";

/// Default version file name, relative to the project directory.
pub const VERSION_FILE_NAME: &str = "Assets/version.txt";

/// Default engine executable.
pub const DEFAULT_PROGRAM: &str = "unity";

/// Default argument template for [`DEFAULT_PROGRAM`].
pub const DEFAULT_ARGS: &[&str] = &[
    "-batchmode",
    "-quit",
    "-nographics",
    "-buildTarget",
    "{target}",
    "-scriptingBackend",
    "{variant}",
    "-scenes",
    "{scenes}",
    "-buildPath",
    "{output}",
];

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    pub game: Option<String>,
    pub organization: Option<String>,
    pub builds_dir: Option<PathBuf>,
    pub versions_dir: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub scenes: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
    /// Installed variants keyed by backend target. Absent means all.
    pub installed: Option<HashMap<String, Vec<BackendVariant>>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSection {
    pub enabled: Option<bool>,
    pub variants: Option<Vec<BackendVariant>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublisherSection {
    /// Environment variable holding the uploader path.
    pub env_var: Option<String>,
}

/// Raw `publish.toml` contents.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub backend: BackendSection,
    /// Per-platform overrides keyed by channel name.
    pub targets: BTreeMap<String, TargetSection>,
    pub publisher: PublisherSection,
}

/// Parsed configuration anchored at a project directory.
///
/// Relative paths in the file are resolved against the project directory.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    project_dir: PathBuf,
    file: ConfigFile,
}

impl ProjectConfig {
    /// Loads `config_path`, or `publish.toml` under `project_dir`.
    ///
    /// A missing default file yields defaults. A missing explicit file is
    /// an error.
    pub fn load(project_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let (path, required) = match config_path {
            Some(path) => (path.to_path_buf(), true),
            None => (project_dir.join(CONFIG_FILE_NAME), false),
        };

        let file = match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).map_err(|source| AppError::Toml {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!("No {} found, using defaults", path.display());
                ConfigFile::default()
            }
            Err(e) => {
                return Err(AppError::Cli(CliError::ExecutionFailed {
                    command: "read_config".to_string(),
                    reason: format!("Failed to read {}: {}", path.display(), e),
                }));
            }
        };

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            file,
        })
    }

    /// Parses config text without touching the filesystem.
    pub fn parse(contents: &str) -> std::result::Result<ConfigFile, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn from_file(project_dir: &Path, file: ConfigFile) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            file,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Name of the project directory, used when game or organization is unset.
    fn dir_name(&self) -> String {
        self.project_dir
            .canonicalize()
            .unwrap_or_else(|_| self.project_dir.clone())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "game".to_string())
    }

    pub fn settings(&self) -> Result<Settings> {
        let project = &self.file.project;
        let fallback = self.dir_name();
        let builds_dir = self.resolve(project.builds_dir.as_deref().unwrap_or(Path::new("Builds")));

        let mut builder = SettingsBuilder::new()
            .game(project.game.clone().unwrap_or_else(|| fallback.clone()))
            .organization(project.organization.clone().unwrap_or(fallback))
            .builds_dir(builds_dir)
            .scenes(project.scenes.clone());
        if let Some(versions_dir) = &project.versions_dir {
            builder = builder.versions_dir(self.resolve(versions_dir));
        }
        Ok(builder.build()?)
    }

    pub fn version_file(&self) -> PathBuf {
        self.resolve(
            self.file
                .project
                .version_file
                .as_deref()
                .unwrap_or(Path::new(VERSION_FILE_NAME)),
        )
    }

    /// Engine backend running from the project directory.
    pub fn backend(&self) -> CommandBackend {
        let section = &self.file.backend;
        let program = section.program.as_deref().unwrap_or(DEFAULT_PROGRAM);
        let args = section
            .args
            .clone()
            .unwrap_or_else(|| DEFAULT_ARGS.iter().map(|a| a.to_string()).collect());

        let mut backend = CommandBackend::new(program, args).with_working_dir(&self.project_dir);
        if let Some(installed) = &section.installed {
            backend = backend.with_installed(installed.clone());
        }
        backend
    }

    /// One config per platform, in run order, with file overrides applied.
    pub fn target_configs(&self) -> Result<Vec<BuildTargetConfig>> {
        for channel in self.file.targets.keys() {
            if channel.parse::<Platform>().is_err() {
                return Err(AppError::Cli(CliError::InvalidArguments {
                    reason: format!("Unknown platform in [targets.{channel}]"),
                }));
            }
        }

        Ok(Platform::ALL
            .into_iter()
            .map(|platform| {
                let mut config = BuildTargetConfig::new(platform);
                if let Some(section) = self.section_for(platform) {
                    if let Some(enabled) = section.enabled {
                        config.enabled = enabled;
                    }
                    if let Some(variants) = &section.variants {
                        config.variants = variants.clone();
                    }
                }
                config
            })
            .collect())
    }

    fn section_for(&self, platform: Platform) -> Option<&TargetSection> {
        self.file
            .targets
            .iter()
            .find(|(key, _)| key.parse::<Platform>().ok() == Some(platform))
            .map(|(_, section)| section)
    }

    /// Environment variable read for the uploader path.
    pub fn publisher_env_var(&self) -> &str {
        self.file
            .publisher
            .env_var
            .as_deref()
            .unwrap_or(BUTLER_PATH_ENV)
    }
}

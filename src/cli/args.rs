//! Command line argument parsing and validation.
//!
//! This module provides the clap definitions for every subcommand and the
//! runtime configuration derived from them.

use crate::error::CliError;
use crate::pipeline::Platform;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build matrix runner for game projects
#[derive(Parser, Debug)]
#[command(
    name = "publish_matrix",
    version,
    about = "Build, package and publish game builds for several platforms",
    long_about = "Builds each selected platform with the configured engine command, zips the output and pushes it to itch.io with butler.

Per-target failures do not stop the run. Every failure is reported at the end.

Usage:
  publish_matrix build
  publish_matrix build --platform linux --platform webgl --butler ~/bin/butler
  publish_matrix version bump-minor
  publish_matrix prefs set-butler /opt/butler/butler

Exit code 1 = every selected target failed or the command could not run."
)]
pub struct Args {
    /// Project directory holding publish.toml and the version file
    #[arg(short = 'C', long, global = true, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Config file to read instead of <project-dir>/publish.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preferences file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH", env = "PUBLISH_MATRIX_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Print extra progress detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, package and upload the selected platforms
    Build(BuildArgs),

    /// List platforms with their selection and output paths
    Targets,

    /// Show or change the project version
    Version {
        #[command(subcommand)]
        action: VersionAction,
    },

    /// Show or change stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
    /// Build only these platforms: windows, mac, linux, webgl
    #[arg(short, long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<Platform>,

    /// Build every platform
    #[arg(long, conflicts_with = "platforms")]
    pub all: bool,

    /// Uploader executable. Overrides BUTLER_PATH and the stored preference
    #[arg(long, value_name = "PATH")]
    pub butler: Option<PathBuf>,

    /// Never ask for the uploader path interactively
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VersionAction {
    /// Print the current version
    Show,
    /// Increment the minor component and reset patch
    BumpMinor,
    /// Increment the patch component
    BumpPatch,
    /// Store an explicit version
    Set {
        /// New version, MAJOR.MINOR.PATCH
        value: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsAction {
    /// Print every stored preference
    Show,
    /// Remember the uploader executable path
    SetButler {
        /// Path to the butler executable
        path: PathBuf,
    },
    /// Forget the stored uploader path
    ClearButler,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if !self.project_dir.is_dir() {
            return Err(CliError::InvalidArguments {
                reason: format!(
                    "Project directory {} does not exist",
                    self.project_dir.display()
                ),
            });
        }

        if let Command::Build(build) = &self.command
            && let Some(butler) = &build.butler
            && butler.as_os_str().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "--butler cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print a plain line unless quiet
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        self.output.println(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message, even in quiet mode
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

//! Application-level error types for the command line front end.
//!
//! Pipeline failures are carried as [`crate::pipeline::Error`]; this module
//! wraps them together with argument, config and I/O problems.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI argument or configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed project config
    #[error("Failed to parse {}: {source}", path.display())]
    Toml {
        /// Config file that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// Build, package or upload errors
    #[error("{0}")]
    Pipeline(#[from] crate::pipeline::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl AppError {
    /// Hint printed under the error message, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Pipeline(crate::pipeline::Error::ConfigError(_)) => {
                Some("Pass --butler, set BUTLER_PATH, or run `publish_matrix prefs set-butler <path>`")
            }
            Self::Pipeline(crate::pipeline::Error::FormatError { .. }) => {
                Some("Versions are MAJOR.MINOR.PATCH, e.g. 1.4.0")
            }
            Self::Toml { .. } | Self::Cli(CliError::InvalidArguments { .. }) => {
                Some("Check publish.toml and the command line flags")
            }
            _ => None,
        }
    }
}

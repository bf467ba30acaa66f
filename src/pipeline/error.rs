//! Error types for the build-and-publish pipeline.
//!
//! Every failure a pipeline stage can produce is one of the variants below.
//! Stages return these as values; the orchestrator turns them into per-target
//! outcomes instead of aborting the run.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error kinds.
#[derive(Error, Debug)]
pub enum Error {
    /// Version text is not exactly `major.minor.patch`.
    #[error("Version format is incorrect: {input:?} ({reason}). Expected format: X.Y.Z")]
    FormatError {
        /// The rejected input
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// Raw I/O failure without path context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// I/O failure while operating on a known path.
    #[error("failed {context} `{}`: {source}", path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Required configuration could not be resolved.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The native build failed for a platform/variant pair.
    #[error("{0}")]
    BuildBackendError(String),

    /// The uploader exited non-zero or could not be started.
    #[error("Upload failed: {0}")]
    UploadError(String),

    /// Zip archive writing failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal failed.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Relative path computation failed.
    #[error("Path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Short kind label used in aggregated reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FormatError { .. } => "FormatError",
            Self::IoError(_) | Self::Fs { .. } | Self::Walk(_) | Self::StripPrefix(_) => "IOError",
            Self::ConfigError(_) => "ConfigError",
            Self::BuildBackendError(_) => "BuildBackendError",
            Self::UploadError(_) => "UploadError",
            Self::Zip(_) => "IOError",
            Self::GenericError(_) => "Error",
        }
    }
}

/// Attach the failing operation and path to an I/O result.
pub trait ErrorExt<T> {
    /// Wrap the error as [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Turn a missing value into an error carrying a message.
pub trait Context<T> {
    /// Convert into a [`Error::GenericError`] carrying `msg`.
    fn context<C: std::fmt::Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading version file", "/definitely/not/here")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("reading version file"));
        assert!(msg.contains("/definitely/not/here"));
        assert_eq!(err.kind(), "IOError");
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let none: Option<u8> = None;
        let err = none.context("game name is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "game name is required"));
    }
}

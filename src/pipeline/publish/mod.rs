//! Artifact publishing.
//!
//! [`Publisher`] is the transport seam; [`ButlerPublisher`] pushes artifacts
//! to itch.io with the `butler` command-line uploader.

mod butler;
mod prefs;
mod resolver;

pub use butler::ButlerPublisher;
pub use prefs::{BUTLER_PATH_KEY, Preferences};
pub use resolver::{BUTLER_PATH_ENV, ExecutableResolver, NoPrompt, PathPrompt, StdinPrompt};

use crate::pipeline::{error::Result, version::Version};
use std::path::Path;

/// Captured result of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRecord {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Pushes packaged artifacts to a remote channel.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Uploads `artifact_path` to `channel` tagged with `version`.
    ///
    /// Any failure, including an unresolvable uploader, comes back as an
    /// error value.
    async fn upload(
        &mut self,
        artifact_path: &Path,
        channel: &str,
        version: &Version,
    ) -> Result<PublishRecord>;
}

//! Build backend contract.
//!
//! The engine build pipeline is an external collaborator. This module defines
//! the narrow interface the pipeline consumes from it, and a command-line
//! implementation in [`command`].

mod command;

pub use command::CommandBackend;

use crate::pipeline::platform::BackendVariant;
use std::path::Path;

/// One build invocation request.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    /// Backend target identifier (e.g. `StandaloneWindows64`).
    pub target: &'a str,
    /// Toolchain variant to build with.
    pub variant: BackendVariant,
    /// Ordered scene list.
    pub scenes: &'a [String],
    /// Executable or bundle path the backend must produce.
    pub output_path: &'a Path,
}

/// What the backend reported for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReport {
    pub success: bool,
    pub error_detail: Option<String>,
}

impl BackendReport {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// External build pipeline.
///
/// Implementations block (asynchronously) until the build completes; a build
/// cannot be interrupted from the caller's side.
#[allow(async_fn_in_trait)]
pub trait BuildBackend {
    /// Whether `variant` can be used to build `target` on this host.
    fn is_backend_installed(&self, target: &str, variant: BackendVariant) -> bool;

    /// Runs one build. Failures are reported in the returned value.
    async fn build(&self, request: &BuildRequest<'_>) -> BackendReport;
}

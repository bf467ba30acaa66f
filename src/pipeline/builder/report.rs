//! Per-target outcomes and the aggregated run report.

use crate::pipeline::{
    error::Error,
    package::Artifact,
    platform::{BackendVariant, Platform},
    publish::PublishRecord,
    version::Version,
};
use std::fmt;

/// Pipeline state of one target during one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Idle,
    Building,
    BuildFailed,
    Built,
    Packaging,
    PackageFailed,
    Packaged,
    Uploading,
    UploadFailed,
    Uploaded,
}

impl TargetState {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::BuildFailed | Self::PackageFailed | Self::UploadFailed | Self::Uploaded
        )
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of running one target's pipeline.
#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub platform: Platform,
    /// Terminal state reached.
    pub state: TargetState,
    /// Variant used, when the build succeeded.
    pub variant: Option<BackendVariant>,
    pub artifact: Option<Artifact>,
    pub record: Option<PublishRecord>,
    /// Error kind and message, when the pipeline failed.
    pub failure: Option<(&'static str, String)>,
}

impl TargetOutcome {
    pub(super) fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: TargetState::Idle,
            variant: None,
            artifact: None,
            record: None,
            failure: None,
        }
    }

    pub(super) fn advance(&mut self, next: TargetState) {
        log::debug!("{}: {} -> {}", self.platform, self.state, next);
        self.state = next;
    }

    pub(super) fn fail(mut self, state: TargetState, error: &Error) -> Self {
        self.advance(state);
        log::error!("{} failed ({}): {}", self.platform, error.kind(), error);
        self.failure = Some((error.kind(), error.to_string()));
        self
    }

    pub fn succeeded(&self) -> bool {
        self.state == TargetState::Uploaded
    }

    /// One-line notice for a successful target.
    pub fn success_notice(&self) -> Option<String> {
        if !self.succeeded() {
            return None;
        }
        let mut notice = format!("{} uploaded", self.platform);
        if let Some(artifact) = &self.artifact {
            notice.push_str(&format!(
                " to channel {} ({}, {} bytes, sha256 {})",
                artifact.metadata.channel,
                artifact
                    .versioned_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                artifact.size,
                artifact.checksum
            ));
        }
        if let Some(variant) = self.variant {
            notice.push_str(&format!(" [{variant}]"));
        }
        Some(notice)
    }

    /// Failure message naming the platform and the failed stage.
    pub fn failure_message(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|(kind, message)| format!("{} {} ({}): {}", self.platform, self.state, kind, message))
    }
}

/// Everything that happened in one run, in processing order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub version: Version,
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// True when targets ran and none of them uploaded.
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.successes().next().is_none()
    }

    pub fn success_notices(&self) -> Vec<String> {
        self.outcomes.iter().filter_map(TargetOutcome::success_notice).collect()
    }

    /// All failure messages joined, or `None` if nothing failed.
    pub fn failure_summary(&self) -> Option<String> {
        let messages: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(TargetOutcome::failure_message)
            .collect();
        (!messages.is_empty()).then(|| messages.join("\n"))
    }
}

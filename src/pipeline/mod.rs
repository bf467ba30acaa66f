//! Build-and-publish pipeline.
//!
//! Runs each selected platform through three stages:
//! 1. build via a [`BuildBackend`]
//! 2. package the output with [`ArtifactPackager`]
//! 3. upload the archive with a [`Publisher`]
//!
//! The [`BuildOrchestrator`] drives the stages and collects per-target
//! outcomes into a [`RunReport`]. The project version is kept by
//! [`VersionStore`] and stamped on every artifact and upload.

pub mod backend;
pub mod builder;
pub mod error;
pub mod package;
pub mod platform;
pub mod publish;
pub mod settings;
pub mod utils;
pub mod version;

pub use backend::{BackendReport, BuildBackend, BuildRequest, CommandBackend};
pub use builder::{BuildOrchestrator, RunReport, TargetOutcome, TargetState};
pub use error::{Error, Result};
pub use package::{Artifact, ArtifactMetadata, ArtifactPackager};
pub use platform::{BackendVariant, BuildResult, BuildTarget, BuildTargetConfig, Platform};
pub use publish::{
    BUTLER_PATH_ENV, BUTLER_PATH_KEY, ButlerPublisher, ExecutableResolver, NoPrompt, PathPrompt,
    Preferences, PublishRecord, Publisher, StdinPrompt,
};
pub use settings::{Settings, SettingsBuilder};
pub use version::{DEFAULT_VERSION, Version, VersionStore};

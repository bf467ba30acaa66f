//! Main build-and-publish orchestration.
//!
//! This module provides the [`BuildOrchestrator`] that runs each selected
//! platform through build, package and upload, one platform at a time.

use super::report::{RunReport, TargetOutcome, TargetState};
use crate::pipeline::{
    backend::BuildBackend,
    package::ArtifactPackager,
    platform::{BuildTarget, BuildTargetConfig, Platform},
    publish::Publisher,
    settings::Settings,
    version::Version,
};

/// Runs the build matrix.
///
/// Owns the ordered target list. Targets run strictly in sequence, and a
/// failing target never stops the ones after it.
///
/// # Examples
///
/// ```no_run
/// use publish_matrix::pipeline::{
///     BuildOrchestrator, BuildTargetConfig, ButlerPublisher, CommandBackend,
///     ExecutableResolver, NoPrompt, Preferences, SettingsBuilder, Version,
/// };
///
/// # async fn example() -> publish_matrix::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .game("Grib")
///     .organization("pierotechnical")
///     .builds_dir("Builds")
///     .build()?;
/// let resolver = ExecutableResolver::new(Preferences::load("prefs.json")?, Box::new(NoPrompt));
/// let mut orchestrator = BuildOrchestrator::new(
///     settings.clone(),
///     BuildTargetConfig::defaults(),
///     CommandBackend::new("unity", vec!["-buildTarget".into(), "{target}".into()]),
///     ButlerPublisher::new(resolver, settings),
/// );
///
/// let report = orchestrator.run_selected(&Version::new(1, 2, 3)).await;
/// for notice in report.success_notices() {
///     println!("{notice}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BuildOrchestrator<B, P> {
    settings: Settings,
    targets: Vec<BuildTargetConfig>,
    packager: ArtifactPackager,
    backend: B,
    publisher: P,
}

impl<B: BuildBackend, P: Publisher> BuildOrchestrator<B, P> {
    pub fn new(settings: Settings, targets: Vec<BuildTargetConfig>, backend: B, publisher: P) -> Self {
        let packager = ArtifactPackager::new(&settings);
        Self {
            settings,
            targets,
            packager,
            backend,
            publisher,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn targets(&self) -> &[BuildTargetConfig] {
        &self.targets
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Toggles one platform. Returns false if it is not configured.
    pub fn set_enabled(&mut self, platform: Platform, enabled: bool) -> bool {
        match self.targets.iter_mut().find(|t| t.platform == platform) {
            Some(target) => {
                target.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enables exactly the given platforms and disables the rest.
    pub fn select_only(&mut self, platforms: &[Platform]) {
        for target in &mut self.targets {
            target.enabled = platforms.contains(&target.platform);
        }
    }

    /// Runs every enabled target in configured order.
    pub async fn run_selected(&mut self, version: &Version) -> RunReport {
        let selected: Vec<usize> = self
            .targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.enabled)
            .map(|(i, _)| i)
            .collect();

        if selected.is_empty() {
            log::warn!("No platforms selected");
        }

        let mut outcomes = Vec::with_capacity(selected.len());
        for index in selected {
            outcomes.push(self.run_index(index, version).await);
        }

        RunReport {
            version: *version,
            outcomes,
        }
    }

    /// Runs one platform whether or not it is enabled.
    ///
    /// Returns `None` if the platform is not configured.
    pub async fn run_target(&mut self, platform: Platform, version: &Version) -> Option<TargetOutcome> {
        let index = self.targets.iter().position(|t| t.platform == platform)?;
        Some(self.run_index(index, version).await)
    }

    async fn run_index(&mut self, index: usize, version: &Version) -> TargetOutcome {
        let Self {
            settings,
            targets,
            packager,
            backend,
            publisher,
        } = self;
        let target = BuildTarget::new(&targets[index], settings);
        run_pipeline(target, backend, packager, publisher, version).await
    }
}

/// Build → package → upload for one target. Stops at the first failure.
async fn run_pipeline<B: BuildBackend, P: Publisher>(
    target: BuildTarget<'_>,
    backend: &B,
    packager: &ArtifactPackager,
    publisher: &mut P,
    version: &Version,
) -> TargetOutcome {
    let mut outcome = TargetOutcome::new(target.platform());

    outcome.advance(TargetState::Building);
    let build = match target.build(backend).await {
        Ok(build) => build,
        Err(e) => return outcome.fail(TargetState::BuildFailed, &e),
    };
    outcome.advance(TargetState::Built);
    outcome.variant = Some(build.variant);

    outcome.advance(TargetState::Packaging);
    let artifact = match target.package(&build, packager, version).await {
        Ok(artifact) => artifact,
        Err(e) => return outcome.fail(TargetState::PackageFailed, &e),
    };
    outcome.advance(TargetState::Packaged);

    outcome.advance(TargetState::Uploading);
    let upload = target.upload(&artifact, publisher, version).await;
    outcome.artifact = Some(artifact);
    match upload {
        Ok(record) => {
            outcome.advance(TargetState::Uploaded);
            log::info!("{} uploaded successfully", target.platform());
            outcome.record = Some(record);
            outcome
        }
        Err(e) => outcome.fail(TargetState::UploadFailed, &e),
    }
}

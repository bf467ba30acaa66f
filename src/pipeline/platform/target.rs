//! Per-platform build, package and upload steps.

use super::{BackendVariant, Platform};
use crate::pipeline::{
    backend::{BuildBackend, BuildRequest},
    error::{Error, Result},
    package::{Artifact, ArtifactMetadata, ArtifactPackager},
    publish::{PublishRecord, Publisher},
    settings::Settings,
    utils::fs,
    version::Version,
};
use std::path::PathBuf;

/// Selection state and backend preferences for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTargetConfig {
    pub platform: Platform,
    pub enabled: bool,
    /// Backend variants in the order they are attempted.
    pub variants: Vec<BackendVariant>,
}

impl BuildTargetConfig {
    /// Config with the platform's default selection and variants.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            enabled: platform.enabled_by_default(),
            variants: platform.default_variants(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_variants(mut self, variants: Vec<BackendVariant>) -> Self {
        self.variants = variants;
        self
    }

    /// Configs for every platform with default settings.
    pub fn defaults() -> Vec<Self> {
        Platform::ALL.into_iter().map(Self::new).collect()
    }
}

/// A successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub platform: Platform,
    /// Directory holding the build output.
    pub output_dir: PathBuf,
    /// Variant that produced the build.
    pub variant: BackendVariant,
}

/// One platform's pipeline, borrowing its config and the shared settings.
#[derive(Debug, Clone, Copy)]
pub struct BuildTarget<'a> {
    config: &'a BuildTargetConfig,
    settings: &'a Settings,
}

impl<'a> BuildTarget<'a> {
    pub fn new(config: &'a BuildTargetConfig, settings: &'a Settings) -> Self {
        Self { config, settings }
    }

    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    pub fn is_available(&self) -> bool {
        self.config.platform.is_available()
    }

    /// `{builds_dir}/{game}_{label}`.
    pub fn output_dir(&self) -> PathBuf {
        self.config
            .platform
            .output_dir(self.settings.builds_dir(), self.settings.game())
    }

    /// `{output_dir}.zip`, next to the output directory.
    pub fn archive_path(&self) -> PathBuf {
        let mut name = self.output_dir().into_os_string();
        name.push(".zip");
        PathBuf::from(name)
    }

    /// Builds with the first installed variant that succeeds.
    ///
    /// The output directory is recreated before every attempt.
    pub async fn build<B: BuildBackend>(&self, backend: &B) -> Result<BuildResult> {
        let platform = self.config.platform;
        let label = platform.label();

        if !self.is_available() {
            return Err(Error::BuildBackendError(format!(
                "{label} builds cannot be performed on this host"
            )));
        }
        if self.config.variants.is_empty() {
            return Err(Error::BuildBackendError(format!(
                "No backend variants configured for {label}"
            )));
        }

        let output_dir = self.output_dir();
        let output_path = output_dir.join(platform.executable_name(self.settings.game()));
        let mut failures = Vec::new();

        for &variant in &self.config.variants {
            if !backend.is_backend_installed(platform.backend_target(), variant) {
                log::warn!("{} backend for {} is not installed, skipping", variant, label);
                continue;
            }

            fs::create_dir_all(&output_dir, true).await?;

            log::info!("Building {} with {}", label, variant);
            let report = backend
                .build(&BuildRequest {
                    target: platform.backend_target(),
                    variant,
                    scenes: self.settings.scenes(),
                    output_path: &output_path,
                })
                .await;

            if report.success {
                log::info!("Build for {} succeeded with {}", label, variant);
                return Ok(BuildResult {
                    platform,
                    output_dir,
                    variant,
                });
            }

            let detail = report
                .error_detail
                .unwrap_or_else(|| "no detail reported".to_string());
            log::error!("Build for {} with {} failed: {}", label, variant, detail);
            failures.push(format!("Build for {label} with {variant} failed: {detail}"));
        }

        if failures.is_empty() {
            let tried: Vec<&str> = self.config.variants.iter().map(|v| v.as_str()).collect();
            return Err(Error::BuildBackendError(format!(
                "No backend variant installed for {label} (tried: {})",
                tried.join(", ")
            )));
        }
        Err(Error::BuildBackendError(failures.join("\n")))
    }

    /// Zips a build into this target's archive and its versioned copy.
    pub async fn package(
        &self,
        result: &BuildResult,
        packager: &ArtifactPackager,
        version: &Version,
    ) -> Result<Artifact> {
        let metadata = ArtifactMetadata {
            channel: self.config.platform.channel().to_string(),
            version: version.to_string(),
            platform_label: self.config.platform.label().to_string(),
        };
        packager
            .package(&result.output_dir, &self.archive_path(), metadata)
            .await
    }

    /// Uploads a packaged artifact to this platform's channel.
    pub async fn upload<P: Publisher>(
        &self,
        artifact: &Artifact,
        publisher: &mut P,
        version: &Version,
    ) -> Result<PublishRecord> {
        publisher
            .upload(&artifact.path, &artifact.metadata.channel, version)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SettingsBuilder, backend::BackendReport};
    use std::cell::RefCell;
    use std::path::Path;

    /// Backend with a fixed set of installed variants that records calls.
    #[derive(Debug, Default)]
    struct ScriptedBackend {
        installed: Vec<BackendVariant>,
        failing: Vec<BackendVariant>,
        calls: RefCell<Vec<BackendVariant>>,
    }

    impl BuildBackend for ScriptedBackend {
        fn is_backend_installed(&self, _target: &str, variant: BackendVariant) -> bool {
            self.installed.contains(&variant)
        }

        async fn build(&self, request: &BuildRequest<'_>) -> BackendReport {
            self.calls.borrow_mut().push(request.variant);
            if self.failing.contains(&request.variant) {
                return BackendReport::failed("compiler crashed");
            }
            std::fs::write(request.output_path, b"binary").unwrap();
            BackendReport::succeeded()
        }
    }

    fn settings(root: &Path) -> Settings {
        SettingsBuilder::new()
            .game("Grib")
            .organization("pierotechnical")
            .builds_dir(root.join("Builds"))
            .build()
            .unwrap()
    }

    fn linux() -> BuildTargetConfig {
        BuildTargetConfig::new(Platform::Linux)
            .with_variants(vec![BackendVariant::Native, BackendVariant::Managed])
    }

    #[tokio::test]
    async fn falls_back_to_installed_variant() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = linux();
        let backend = ScriptedBackend {
            installed: vec![BackendVariant::Managed],
            ..Default::default()
        };

        let result = BuildTarget::new(&config, &settings).build(&backend).await.unwrap();

        assert_eq!(result.variant, BackendVariant::Managed);
        assert_eq!(*backend.calls.borrow(), vec![BackendVariant::Managed]);
        assert!(result.output_dir.join("Grib.x86_64").is_file());
    }

    #[tokio::test]
    async fn falls_back_after_failed_variant() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = linux();
        let backend = ScriptedBackend {
            installed: vec![BackendVariant::Native, BackendVariant::Managed],
            failing: vec![BackendVariant::Native],
            ..Default::default()
        };

        let result = BuildTarget::new(&config, &settings).build(&backend).await.unwrap();
        assert_eq!(result.variant, BackendVariant::Managed);
        assert_eq!(
            *backend.calls.borrow(),
            vec![BackendVariant::Native, BackendVariant::Managed]
        );
    }

    #[tokio::test]
    async fn nothing_installed_names_platform() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = linux();
        let backend = ScriptedBackend::default();

        let err = BuildTarget::new(&config, &settings).build(&backend).await.unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::BuildBackendError(_)));
        assert!(msg.contains("Linux"));
        assert!(msg.contains("native, managed"));
    }

    #[tokio::test]
    async fn all_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = linux();
        let backend = ScriptedBackend {
            installed: vec![BackendVariant::Native, BackendVariant::Managed],
            failing: vec![BackendVariant::Native, BackendVariant::Managed],
            ..Default::default()
        };

        let msg = BuildTarget::new(&config, &settings)
            .build(&backend)
            .await
            .unwrap_err()
            .to_string();
        assert!(msg.contains("Build for Linux with native failed: compiler crashed"));
        assert!(msg.contains("Build for Linux with managed failed: compiler crashed"));
    }

    #[tokio::test]
    async fn stale_output_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = BuildTargetConfig::new(Platform::Windows);
        let target = BuildTarget::new(&config, &settings);
        std::fs::create_dir_all(target.output_dir()).unwrap();
        std::fs::write(target.output_dir().join("stale.dll"), b"old").unwrap();

        let backend = ScriptedBackend {
            installed: vec![BackendVariant::Native],
            ..Default::default()
        };
        target.build(&backend).await.unwrap();

        assert!(!target.output_dir().join("stale.dll").exists());
        assert!(target.output_dir().join("Grib.exe").is_file());
    }

    #[test]
    fn archive_sits_next_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let config = BuildTargetConfig::new(Platform::WebGl);
        let target = BuildTarget::new(&config, &settings);
        assert_eq!(target.archive_path(), dir.path().join("Builds").join("Grib_WebGL.zip"));
    }
}

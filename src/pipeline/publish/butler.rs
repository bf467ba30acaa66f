//! itch.io publishing through the `butler` uploader.

use super::{PublishRecord, Publisher, resolver::ExecutableResolver};
use crate::pipeline::{
    error::{Error, Result},
    settings::Settings,
    version::Version,
};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

/// [`Publisher`] that runs `butler push`.
#[derive(Debug)]
pub struct ButlerPublisher {
    resolver: ExecutableResolver,
    settings: Settings,
}

impl ButlerPublisher {
    pub fn new(resolver: ExecutableResolver, settings: Settings) -> Self {
        Self { resolver, settings }
    }

    /// Arguments for `butler`:
    /// `push <artifact> <org>/<game>:<channel> --userversion <version>`.
    pub fn push_args(&self, artifact_path: &Path, channel: &str, version: &Version) -> Vec<OsString> {
        vec![
            "push".into(),
            artifact_path.as_os_str().to_os_string(),
            self.settings.upload_target(channel).into(),
            "--userversion".into(),
            version.to_string().into(),
        ]
    }
}

impl Publisher for ButlerPublisher {
    async fn upload(
        &mut self,
        artifact_path: &Path,
        channel: &str,
        version: &Version,
    ) -> Result<PublishRecord> {
        let butler = self.resolver.resolve()?;
        let args = self.push_args(artifact_path, channel, version);
        log::info!(
            "Uploading {} to {} ({})",
            artifact_path.display(),
            self.settings.upload_target(channel),
            version
        );

        // Both streams are read to the end before the exit status is checked
        let output = tokio::process::Command::new(&butler)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::UploadError(format!("failed to start {}: {}", butler.display(), e))
            })?;

        let record = PublishRecord {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            log::debug!("Butler upload finished:\n{}", record.stdout);
            Ok(record)
        } else {
            Err(Error::UploadError(format!(
                "butler exited with code {:?}:\n{}",
                record.exit_code,
                record.stderr.trim_end()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{NoPrompt, Preferences, SettingsBuilder};

    fn publisher(dir: &Path, butler: Option<OsString>) -> ButlerPublisher {
        let settings = SettingsBuilder::new()
            .game("Cool Game")
            .organization("My Org")
            .builds_dir(dir.join("Builds"))
            .build()
            .unwrap();
        let prefs = Preferences::load(dir.join("preferences.json")).unwrap();
        let resolver = ExecutableResolver::new(prefs, Box::new(NoPrompt)).with_env_value(butler);
        ButlerPublisher::new(resolver, settings)
    }

    #[test]
    fn push_args_compose_normalized_target() {
        let dir = tempfile::tempdir().unwrap();
        let p = publisher(dir.path(), None);
        let args = p.push_args(Path::new("/b/Cool Game_Windows.zip"), "windows", &Version::new(1, 2, 3));
        assert_eq!(
            args,
            vec![
                OsString::from("push"),
                OsString::from("/b/Cool Game_Windows.zip"),
                OsString::from("my-org/cool-game:windows"),
                OsString::from("--userversion"),
                OsString::from("1.2.3"),
            ]
        );
    }

    #[tokio::test]
    async fn unresolved_uploader_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = publisher(dir.path(), None);
        let err = p
            .upload(Path::new("a.zip"), "windows", &Version::new(0, 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        // `false` ignores its arguments and exits 1
        let mut p = publisher(dir.path(), Some(OsString::from("false")));
        let err = p
            .upload(Path::new("a.zip"), "windows", &Version::new(0, 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UploadError(ref m) if m.contains("Some(1)")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_returns_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = publisher(dir.path(), Some(OsString::from("true")));
        let record = p
            .upload(Path::new("a.zip"), "linux", &Version::new(0, 1, 0))
            .await
            .unwrap();
        assert_eq!(record.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unstartable_uploader_is_upload_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let butler = dir.path().join("butler");
        std::fs::write(&butler, "#!/nonexistent/interpreter\n").unwrap();
        std::fs::set_permissions(&butler, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut p = publisher(dir.path(), Some(butler.into_os_string()));
        let err = p
            .upload(Path::new("a.zip"), "windows", &Version::new(0, 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UploadError(ref m) if m.contains("failed to start")));
    }
}

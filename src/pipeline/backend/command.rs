//! Build backend driven by an external engine executable.
//!
//! Runs a configured program (typically an editor in batch mode) once per
//! build, expanding placeholders in its argument list:
//!
//! - `{target}` - backend target identifier
//! - `{variant}` - `native` or `managed`
//! - `{output}` - executable or bundle path to produce
//! - `{scenes}` - comma-separated scene list

use super::{BackendReport, BuildBackend, BuildRequest};
use crate::pipeline::platform::BackendVariant;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;

/// Number of trailing stderr lines kept in a failure report.
const STDERR_TAIL_LINES: usize = 20;

/// [`BuildBackend`] that shells out to an engine executable.
#[derive(Debug)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    /// Installed variants per backend target. `None` means every variant.
    installed: Option<HashMap<String, Vec<BackendVariant>>>,
    working_dir: Option<PathBuf>,
    resolved: OnceLock<Option<PathBuf>>,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            installed: None,
            working_dir: None,
            resolved: OnceLock::new(),
        }
    }

    /// Restricts which variants count as installed, keyed by backend target.
    ///
    /// Targets missing from the map have no installed variants.
    pub fn with_installed(mut self, installed: HashMap<String, Vec<BackendVariant>>) -> Self {
        self.installed = Some(installed);
        self
    }

    /// Runs the program from `dir`.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program path, resolved on first use and cached.
    fn program_path(&self) -> Option<&PathBuf> {
        self.resolved
            .get_or_init(|| match which::which(&self.program) {
                Ok(path) => {
                    log::debug!("Found build program at: {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    log::warn!("Build program {} not found: {}", self.program, e);
                    None
                }
            })
            .as_ref()
    }

    /// Expands placeholders in the argument template for `request`.
    pub fn expand_args(&self, request: &BuildRequest<'_>) -> Vec<String> {
        let output = request.output_path.display().to_string();
        let scenes = request.scenes.join(",");
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{target}", request.target)
                    .replace("{variant}", request.variant.as_str())
                    .replace("{output}", &output)
                    .replace("{scenes}", &scenes)
            })
            .collect()
    }
}

impl BuildBackend for CommandBackend {
    fn is_backend_installed(&self, target: &str, variant: BackendVariant) -> bool {
        if self.program_path().is_none() {
            return false;
        }
        match &self.installed {
            None => true,
            Some(map) => map
                .get(target)
                .is_some_and(|variants| variants.contains(&variant)),
        }
    }

    async fn build(&self, request: &BuildRequest<'_>) -> BackendReport {
        let Some(program) = self.program_path() else {
            return BackendReport::failed(format!("build program {} not found", self.program));
        };

        let args = self.expand_args(request);
        log::info!("Running {} {}", program.display(), args.join(" "));

        let mut command = tokio::process::Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        match command.output().await {
            Ok(output) if output.status.success() => BackendReport::succeeded(),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let lines: Vec<&str> = stderr.lines().collect();
                let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
                BackendReport::failed(format!(
                    "{} exited with code {:?}{}{}",
                    self.program,
                    output.status.code(),
                    if tail.is_empty() { "" } else { ":\n" },
                    tail
                ))
            }
            Err(e) => BackendReport::failed(format!("failed to execute {}: {}", self.program, e)),
        }
    }
}

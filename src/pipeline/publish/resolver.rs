//! Uploader executable location.
//!
//! Resolution order:
//! 1. a path supplied by the caller
//! 2. the environment variable (default `BUTLER_PATH`)
//! 3. the `ButlerPath` user preference
//! 4. an interactive prompt, whose answer is saved as the preference

use super::prefs::{BUTLER_PATH_KEY, Preferences};
use crate::pipeline::error::{Error, Result};
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Default environment variable overriding the uploader path.
pub const BUTLER_PATH_ENV: &str = "BUTLER_PATH";

/// Asks the user for a file path.
pub trait PathPrompt: std::fmt::Debug {
    /// Returns `None` if the user gave no answer.
    fn pick(&self, title: &str) -> Result<Option<PathBuf>>;
}

/// Prompts on the terminal. Answers `None` when not attached to one.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl PathPrompt for StdinPrompt {
    fn pick(&self, title: &str) -> Result<Option<PathBuf>> {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            log::warn!("Cannot prompt for \"{}\" in non-interactive mode", title);
            return Ok(None);
        }

        write!(io::stderr(), "{title}: ")?;
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let answer = input.trim().trim_matches('"');

        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }
}

/// Never answers. For headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl PathPrompt for NoPrompt {
    fn pick(&self, _title: &str) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Resolves and remembers the uploader executable path.
#[derive(Debug)]
pub struct ExecutableResolver {
    explicit: Option<PathBuf>,
    env_var: String,
    env_value: Option<OsString>,
    prefs: Preferences,
    prompt: Box<dyn PathPrompt>,
    resolved: Option<PathBuf>,
}

impl ExecutableResolver {
    /// Resolver reading [`BUTLER_PATH_ENV`] from the process environment.
    pub fn new(prefs: Preferences, prompt: Box<dyn PathPrompt>) -> Self {
        Self {
            explicit: None,
            env_var: BUTLER_PATH_ENV.to_string(),
            env_value: std::env::var_os(BUTLER_PATH_ENV),
            prefs,
            prompt,
            resolved: None,
        }
    }

    /// Reads the override from `name` instead of [`BUTLER_PATH_ENV`].
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self.env_value = std::env::var_os(&self.env_var);
        self
    }

    /// Replaces the environment lookup with a fixed value.
    pub fn with_env_value(mut self, value: Option<OsString>) -> Self {
        self.env_value = value;
        self
    }

    /// Path supplied by the caller. Takes precedence over everything else.
    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Returns the uploader path, trying each source in order.
    ///
    /// A successful answer is cached for the lifetime of the resolver.
    pub fn resolve(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.resolved {
            return Ok(path.clone());
        }
        let path = self.lookup()?;
        log::info!("Using uploader at {}", path.display());
        self.resolved = Some(path.clone());
        Ok(path)
    }

    fn lookup(&mut self) -> Result<PathBuf> {
        if let Some(explicit) = &self.explicit {
            return usable(explicit).ok_or_else(|| {
                Error::ConfigError(format!(
                    "uploader not located: {} is not an executable",
                    explicit.display()
                ))
            });
        }

        if let Some(value) = self.env_value.as_ref().filter(|v| !v.is_empty()) {
            let candidate = PathBuf::from(value);
            match usable(&candidate) {
                Some(path) => return Ok(path),
                None => log::warn!(
                    "{} points to {}, which is not an executable",
                    self.env_var,
                    candidate.display()
                ),
            }
        }

        if let Some(stored) = self.prefs.get(BUTLER_PATH_KEY) {
            let candidate = PathBuf::from(stored);
            match usable(&candidate) {
                Some(path) => return Ok(path),
                None => log::warn!(
                    "Saved uploader path {} is not an executable",
                    candidate.display()
                ),
            }
        }

        if let Some(picked) = self.prompt.pick("Locate butler executable")? {
            if let Some(path) = usable(&picked) {
                self.prefs
                    .set(BUTLER_PATH_KEY, path.to_string_lossy().into_owned())?;
                log::info!("Saved uploader path to {}", self.prefs.path().display());
                return Ok(path);
            }
            log::warn!("{} is not an executable", picked.display());
        }

        Err(Error::ConfigError(
            "uploader not located. Set BUTLER_PATH, pass --butler, or run `prefs set-butler`"
                .into(),
        ))
    }
}

/// Absolute executable path for `candidate`, searching `PATH` for bare names.
fn usable(candidate: &Path) -> Option<PathBuf> {
    which::which(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedPrompt(Option<PathBuf>);

    impl PathPrompt for FixedPrompt {
        fn pick(&self, _title: &str) -> Result<Option<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    fn prefs(dir: &Path) -> Preferences {
        Preferences::load(dir.join("preferences.json")).unwrap()
    }

    #[test]
    fn unresolved_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver =
            ExecutableResolver::new(prefs(dir.path()), Box::new(NoPrompt)).with_env_value(None);
        let err = resolver.resolve().unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref m) if m.contains("uploader not located")));
    }

    #[test]
    fn explicit_path_must_be_executable() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = ExecutableResolver::new(prefs(dir.path()), Box::new(NoPrompt))
            .with_env_value(None)
            .with_explicit(Some(dir.path().join("missing-butler")));
        assert!(matches!(resolver.resolve(), Err(Error::ConfigError(_))));
    }

    #[cfg(unix)]
    #[test]
    fn env_beats_preference() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = prefs(dir.path());
        p.set(BUTLER_PATH_KEY, "true").unwrap();

        let mut resolver = ExecutableResolver::new(p, Box::new(NoPrompt))
            .with_env_value(Some(OsString::from("sh")));
        let path = resolver.resolve().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn prompt_answer_is_persisted_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = FixedPrompt(Some(PathBuf::from("sh")));
        let mut resolver =
            ExecutableResolver::new(prefs(dir.path()), Box::new(prompt)).with_env_value(None);

        let first = resolver.resolve().unwrap();
        let second = resolver.resolve().unwrap();
        assert_eq!(first, second);

        let stored = Preferences::load(dir.path().join("preferences.json")).unwrap();
        assert_eq!(stored.get(BUTLER_PATH_KEY), Some(first.to_string_lossy().as_ref()));
    }
}

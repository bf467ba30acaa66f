//! Build platforms and their naming conventions.
//!
//! Each [`Platform`] carries its backend identifier, upload channel, output
//! layout and backend-variant preferences as plain data. Per-run selection
//! state lives in [`BuildTargetConfig`].

mod target;

pub use target::{BuildResult, BuildTarget, BuildTargetConfig};

use crate::pipeline::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A platform the project can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Mac,
    Linux,
    #[serde(rename = "webgl")]
    WebGl,
}

impl Platform {
    /// All platforms, in the order runs process them.
    pub const ALL: [Self; 4] = [Self::Windows, Self::Mac, Self::Linux, Self::WebGl];

    /// Identifier the build backend understands.
    pub const fn backend_target(self) -> &'static str {
        match self {
            Self::Windows => "StandaloneWindows64",
            Self::Mac => "StandaloneOSX",
            Self::Linux => "StandaloneLinux64",
            Self::WebGl => "WebGL",
        }
    }

    /// Upload channel name.
    pub const fn channel(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
            Self::WebGl => "webgl",
        }
    }

    /// Human-readable label, also used in artifact file names.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Mac => "Mac",
            Self::Linux => "Linux",
            Self::WebGl => "WebGL",
        }
    }

    /// Whether the platform is selected when nothing is configured.
    pub const fn enabled_by_default(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Backend variants tried in order when nothing is configured.
    pub fn default_variants(self) -> Vec<BackendVariant> {
        match self {
            Self::Windows | Self::Mac => vec![BackendVariant::Native],
            Self::Linux => vec![BackendVariant::Native, BackendVariant::Managed],
            Self::WebGl => vec![BackendVariant::Managed],
        }
    }

    /// Whether this host can produce builds for the platform.
    pub fn is_available(self) -> bool {
        match self {
            Self::Mac => cfg!(target_os = "macos"),
            _ => true,
        }
    }

    /// Output directory for this platform under `builds_dir`.
    pub fn output_dir(self, builds_dir: &Path, game: &str) -> PathBuf {
        builds_dir.join(format!("{}_{}", game, self.label()))
    }

    /// Name of the executable or bundle the backend writes.
    pub fn executable_name(self, game: &str) -> String {
        match self {
            Self::Windows => format!("{game}.exe"),
            Self::Mac => format!("{game}.app"),
            Self::Linux => format!("{game}.x86_64"),
            Self::WebGl => game.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.channel().eq_ignore_ascii_case(s) || p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "Unknown platform: {s}. Valid platforms: windows, mac, linux, webgl"
                ))
            })
    }
}

/// Toolchain used to compile a platform build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendVariant {
    /// Ahead-of-time native compilation.
    Native,
    /// Managed runtime.
    Managed,
}

impl BackendVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Managed => "managed",
        }
    }
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! `version`: inspect and change the stored project version.

use crate::cli::{RuntimeConfig, VersionAction};
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::{Version, VersionStore};

pub async fn run_version(
    project: &ProjectConfig,
    action: &VersionAction,
    runtime: &RuntimeConfig,
) -> Result<i32> {
    let mut store = VersionStore::new(project.version_file());
    let current = store.load().await?;

    match action {
        VersionAction::Show => runtime.println(&current)?,
        VersionAction::BumpMinor => {
            let next = store.increment_minor(&current).await?;
            runtime.success(&format!("Version {current} -> {next}"))?;
        }
        VersionAction::BumpPatch => {
            let next = store.increment_patch(&current).await?;
            runtime.success(&format!("Version {current} -> {next}"))?;
        }
        VersionAction::Set { value } => {
            let next = value.trim().parse::<Version>()?.to_string();
            if store.persist_if_changed(&next).await? {
                runtime.success(&format!("Version {current} -> {next}"))?;
            } else {
                runtime.println(&format!("Version already {next}"))?;
            }
        }
    }
    runtime.verbose_println(&format!("Version file: {}", store.path().display()))?;
    Ok(0)
}

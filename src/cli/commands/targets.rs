//! `targets`: list every platform and where its output goes.

use crate::cli::RuntimeConfig;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::BuildTarget;

pub fn run_targets(project: &ProjectConfig, runtime: &RuntimeConfig) -> Result<i32> {
    let settings = project.settings()?;
    let configs = project.target_configs()?;

    runtime.section(&format!("{} by {}", settings.game(), settings.organization()))?;
    for config in &configs {
        let target = BuildTarget::new(config, &settings);
        let variants: Vec<&str> = config.variants.iter().map(|v| v.as_str()).collect();
        let mut line = format!(
            "[{}] {} ({})",
            if config.enabled { "x" } else { " " },
            config.platform,
            variants.join(", ")
        );
        if !target.is_available() {
            line.push_str(" - unavailable on this host");
        }
        runtime.println(&line)?;
        runtime.indent(&format!(
            "output:  {}\narchive: {}\nupload:  {}",
            target.output_dir().display(),
            target.archive_path().display(),
            settings.upload_target(config.platform.channel())
        ))?;
    }
    runtime.println(&format!("Versions: {}", settings.versions_dir().display()))?;
    runtime.println(&format!("Game page: {}", settings.game_url()))?;
    Ok(0)
}

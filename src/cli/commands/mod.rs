//! Command execution functions, one per subcommand.

mod build;
mod prefs;
mod targets;
mod version;

pub use build::run_build;
pub use prefs::run_prefs;
pub use targets::run_targets;
pub use version::run_version;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::Preferences;

/// Dispatches the parsed subcommand. Returns the process exit code.
pub async fn execute(args: &Args, runtime: &RuntimeConfig) -> Result<i32> {
    let project = ProjectConfig::load(&args.project_dir, args.config.as_deref())?;
    runtime.verbose_println(&format!(
        "Project directory: {}",
        project.project_dir().display()
    ))?;

    match &args.command {
        Command::Build(build) => {
            let prefs = load_preferences(args)?;
            run_build(&project, prefs, build, runtime).await
        }
        Command::Targets => run_targets(&project, runtime),
        Command::Version { action } => run_version(&project, action, runtime).await,
        Command::Prefs { action } => run_prefs(load_preferences(args)?, action, runtime),
    }
}

fn load_preferences(args: &Args) -> Result<Preferences> {
    let path = match &args.prefs {
        Some(path) => path.clone(),
        None => Preferences::default_path()?,
    };
    Ok(Preferences::load(path)?)
}

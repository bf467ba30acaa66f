//! Command line interface for the build matrix.
//!
//! This module wires argument parsing, project configuration and the
//! pipeline together, one handler per subcommand.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildArgs, Command, PrefsAction, RuntimeConfig, VersionAction};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(args).await
}

/// Runs already-parsed arguments and returns the process exit code.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()?;
    let runtime = RuntimeConfig::from(&args);
    commands::execute(&args, &runtime).await
}

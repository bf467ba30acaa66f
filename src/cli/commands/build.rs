//! `build`: run the matrix for the selected platforms.

use crate::cli::{BuildArgs, RuntimeConfig};
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::{
    BuildOrchestrator, ButlerPublisher, ExecutableResolver, NoPrompt, PathPrompt, Platform,
    Preferences, RunReport, StdinPrompt, Version, VersionStore,
};

/// Builds, packages and uploads every selected platform.
///
/// Returns 1 only when targets ran and none of them uploaded.
pub async fn run_build(
    project: &ProjectConfig,
    prefs: Preferences,
    args: &BuildArgs,
    runtime: &RuntimeConfig,
) -> Result<i32> {
    let settings = project.settings()?;

    let prompt: Box<dyn PathPrompt> = if args.no_prompt {
        Box::new(NoPrompt)
    } else {
        Box::new(StdinPrompt)
    };
    let resolver = ExecutableResolver::new(prefs, prompt)
        .with_env_var(project.publisher_env_var())
        .with_explicit(args.butler.clone());

    let mut orchestrator = BuildOrchestrator::new(
        settings.clone(),
        project.target_configs()?,
        project.backend(),
        ButlerPublisher::new(resolver, settings.clone()),
    );
    if args.all {
        orchestrator.select_only(&Platform::ALL);
    } else if !args.platforms.is_empty() {
        orchestrator.select_only(&args.platforms);
    }

    let mut store = VersionStore::new(project.version_file());
    let version: Version = store.load().await?.parse()?;

    runtime.section(&format!("Building {} {}", settings.game(), version))?;
    for target in orchestrator.targets().iter().filter(|t| t.enabled) {
        let variants: Vec<&str> = target.variants.iter().map(|v| v.as_str()).collect();
        runtime.progress(&format!("{} ({})", target.platform, variants.join(", ")))?;
    }

    let report = orchestrator.run_selected(&version).await;
    print_report(&report, runtime)?;
    if !report.is_empty() {
        runtime.println(&format!("Game page: {}", settings.game_url()))?;
    }

    Ok(exit_code(&report))
}

fn print_report(report: &RunReport, runtime: &RuntimeConfig) -> Result<()> {
    if report.is_empty() {
        runtime.warn("No platforms selected, nothing to do")?;
        return Ok(());
    }

    runtime.section("Results")?;
    for notice in report.success_notices() {
        runtime.success(&notice)?;
    }
    for outcome in report.successes() {
        if let Some(record) = outcome.record.as_ref().filter(|r| !r.stdout.trim().is_empty()) {
            runtime.verbose_println(&format!("{} uploader output:", outcome.platform))?;
            runtime.indent(record.stdout.trim_end())?;
        }
    }
    if let Some(summary) = report.failure_summary() {
        runtime.error(&summary)?;
    }
    Ok(())
}

/// Exit code for a finished run.
pub fn exit_code(report: &RunReport) -> i32 {
    if report.all_failed() { 1 } else { 0 }
}

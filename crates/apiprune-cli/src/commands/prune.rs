//! Implementation of the `apiprune prune` command.
//!
//! Responsibility: resolve the mode (flag or prompt), wire the adapters into
//! `PruneService`, and display the report. No pruning logic lives here.

use apiprune_adapters::{LocalFilesystem, default_chain};
use apiprune_core::{
    application::{PruneReport, PruneService},
    domain::ApiMode,
};
use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, OutputFormat, PruneArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `apiprune prune` command.
#[instrument(skip_all, fields(project = %args.path.display()))]
pub fn execute(
    args: PruneArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if !args.path.is_dir() {
        return Err(CliError::ProjectNotFound { path: args.path });
    }

    let mode = match args.mode {
        Some(mode) => ApiMode::from(mode),
        None => prompt_mode(&global, &output)?,
    };

    let service = PruneService::new(
        Box::new(LocalFilesystem::new()),
        default_chain(),
        config.layout,
        config.rewrite,
    );

    info!(mode = %mode, "Prune started");
    let report = service.process_api_mode(&args.path, mode)?;

    if output.format() == OutputFormat::Json {
        output.json(&report)?;
    } else {
        render(&report, &args.path.display().to_string(), &output)?;
    }
    Ok(())
}

fn render(report: &PruneReport, project: &str, output: &OutputManager) -> CliResult<()> {
    if !report.manifest_found {
        output.info(&format!(
            "No variant manifest in '{project}'; the project is already finalized"
        ))?;
        return Ok(());
    }

    output.header(&format!("Pruned '{project}' for {} mode", report.mode))?;

    let paths = |list: &[std::path::PathBuf]| -> Vec<String> {
        list.iter().map(|p| p.display().to_string()).collect()
    };
    output.list("Removed", &paths(&report.removed_paths))?;
    output.list("Rewritten", &paths(&report.rewritten_files))?;
    output.list("Dependencies removed", &report.removed_dependencies)?;
    output.list("Scripts removed", &report.removed_scripts)?;
    output.list("Scripts edited", &report.edited_scripts)?;

    match report.config_strategy.as_deref() {
        Some("structural") | None => {}
        Some(strategy) => output.warning(&format!(
            "Config module rewritten by the {strategy} fallback; review it before committing"
        ))?,
    }

    output.success(&format!("Project is ready in {} mode", report.mode))?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn prompt_mode(global: &GlobalArgs, output: &OutputManager) -> CliResult<ApiMode> {
    use std::io::IsTerminal;

    use dialoguer::{Select, theme::ColorfulTheme};

    if global.quiet || output.format() == OutputFormat::Json || !std::io::stdin().is_terminal()
    {
        return Err(CliError::MissingMode);
    }

    let modes = [ApiMode::Rest, ApiMode::GraphQl, ApiMode::Both];
    let labels: Vec<String> = modes.iter().map(ToString::to_string).collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which API should the project keep?")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read the mode selection".into(),
            source: Some(Box::new(e)),
        })?;

    choice.map(|i| modes[i]).ok_or(CliError::Cancelled)
}

#[cfg(not(feature = "interactive"))]
fn prompt_mode(_global: &GlobalArgs, _output: &OutputManager) -> CliResult<ApiMode> {
    Err(CliError::MissingMode)
}

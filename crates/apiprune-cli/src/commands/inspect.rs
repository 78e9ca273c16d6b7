//! `apiprune inspect`: show what each mode of the manifest owns.

use std::path::PathBuf;

use apiprune_adapters::LocalFilesystem;
use apiprune_core::{
    application::{ApplicationError, ManifestService, ManifestSummary},
    error::PruneError,
};
use tracing::instrument;

use crate::{
    cli::{InspectArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.path.display()))]
pub fn execute(args: InspectArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.path.is_dir() {
        return Err(CliError::ProjectNotFound { path: args.path });
    }

    let service = ManifestService::new(Box::new(LocalFilesystem::new()), config.layout);
    let summary = match service.inspect(&args.path) {
        Ok(summary) => summary,
        Err(PruneError::Application(ApplicationError::ManifestNotFound { path })) => {
            output.info(&format!(
                "No manifest at {}; the project is already finalized",
                path.display()
            ))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if output.format() == OutputFormat::Json {
        output.json(&summary)?;
    } else {
        render(&summary, &output)?;
    }
    Ok(())
}

fn render(summary: &ManifestSummary, output: &OutputManager) -> CliResult<()> {
    output.header(&format!(
        "{} (version {})",
        summary.path.display(),
        if summary.version.is_empty() { "unset" } else { summary.version.as_str() }
    ))?;
    output.print(&format!(
        "Control script: {} (package script '{}')",
        summary.control_script.path, summary.control_script.script
    ))?;

    let paths = |list: &[PathBuf]| -> Vec<String> {
        list.iter().map(|p| p.display().to_string()).collect()
    };

    for mode in &summary.modes {
        output.print("")?;
        output.header(&format!("[{}] region marker '{}'", mode.name, mode.region_marker))?;
        output.list("File patterns", &mode.file_patterns)?;
        output.list("Currently matched", &paths(&mode.matched_paths))?;
        output.list("Packages", &mode.packages)?;
        output.list("Dev packages", &mode.dev_packages)?;
        output.list("Scripts", &mode.scripts)?;
        output.list("Script edits", &mode.script_edits)?;
        output.list("Files with regions", &paths(&mode.marked_files))?;
    }
    Ok(())
}

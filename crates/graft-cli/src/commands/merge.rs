//! Implementation of the `graft merge` command.

use tracing::{info, instrument};

use crate::{
    cli::{MergeArgs, global::GlobalArgs},
    commands::{project_service, run_merge, show_report},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute `graft merge`.
///
/// 1. Open the project and find its manifest
/// 2. Merge the source tree (locating the payload root if asked)
/// 3. Render the report; skips and per-file failures still exit 0
#[instrument(skip_all, fields(project = %args.project.display(), source = %args.source.display()))]
pub fn execute(
    args: MergeArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = project_service(&config)?.open(
        &args.project,
        args.manifest.as_deref(),
        config.manifest_extension(),
    )?;

    let report = run_merge(&project, &args.source, &args.merge, &config, &output)?;
    info!(
        copied = report.copied.len(),
        entries = report.new_entry_count(),
        skipped = report.skipped.len(),
        "Merge finished"
    );

    if global.is_json() {
        return output.json("merge", &report);
    }
    show_report(&report, &global, &output)
}

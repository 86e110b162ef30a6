//! Implementation of the `graft entries` command.

use tracing::instrument;

use graft_core::domain::ManifestEntry;

use crate::{
    cli::{EntriesArgs, ListFormat, global::GlobalArgs},
    commands::project_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project.display()))]
pub fn execute(
    args: EntriesArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let projects = project_service(&config)?;
    let project = projects.open(
        &args.project,
        args.manifest.as_deref(),
        config.manifest_extension(),
    )?;
    let manifest = projects.open_manifest(&project)?;
    let entries = select(manifest.entries(), args.kind.as_deref());

    let format = if global.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => output.json("entries", &entries)?,
        ListFormat::Table => {
            output.header(&format!(
                "{} ({} entries)",
                project.manifest_path.display(),
                entries.len()
            ))?;
            for line in table(&entries) {
                output.print(&line)?;
            }
        }
        // Bypass OutputManager so piped listings ignore --quiet.
        ListFormat::List => {
            for entry in &entries {
                println!("{entry}");
            }
        }
        ListFormat::Csv => {
            for line in csv(&entries) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Entries of `kind` (any when `None`), sorted by kind and path.
fn select(entries: Vec<ManifestEntry>, kind: Option<&str>) -> Vec<ManifestEntry> {
    let mut selected: Vec<ManifestEntry> = entries
        .into_iter()
        .filter(|e| kind.is_none_or(|k| e.kind.as_str().eq_ignore_ascii_case(k)))
        .collect();
    selected.sort_by(|a, b| {
        a.kind
            .as_str()
            .cmp(b.kind.as_str())
            .then_with(|| a.include.key().cmp(b.include.key()))
    });
    selected
}

fn table(entries: &[ManifestEntry]) -> Vec<String> {
    let width = entries
        .iter()
        .map(|e| e.kind.as_str().len())
        .max()
        .unwrap_or(0)
        .max("KIND".len());
    std::iter::once(format!("  {:<width$}  INCLUDE", "KIND"))
        .chain(
            entries
                .iter()
                .map(|e| format!("  {:<width$}  {}", e.kind.as_str(), e.include)),
        )
        .collect()
}

fn csv(entries: &[ManifestEntry]) -> Vec<String> {
    std::iter::once("kind,include".to_string())
        .chain(
            entries
                .iter()
                .map(|e| format!("{},{}", csv_field(e.kind.as_str()), csv_field(&e.include.to_string()))),
        )
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

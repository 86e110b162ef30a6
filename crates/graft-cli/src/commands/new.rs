//! Implementation of the `graft new` command.
//!
//! Establishes the project from a template, then merges the payload into
//! it when one is given. No business logic lives here.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, instrument};

use graft_core::application::{InitRequest, MergeReport, Project};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    commands::{project_service, run_merge, show_report},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// What `graft new --output-format json` prints.
#[derive(Debug, Serialize)]
struct NewOutcome {
    root: PathBuf,
    manifest: PathBuf,
    reused: bool,
    template_files: usize,
    merge: Option<MergeReport>,
}

/// Execute `graft new`.
#[instrument(skip_all, fields(target = %args.target.display()))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if let Some(name) = &args.name {
        validate_project_name(name)?;
    }
    if args.merge.dry_run && args.payload.is_none() {
        return Err(CliError::invalid_input("--dry-run needs --payload"));
    }

    let mut request = InitRequest::new(&args.template, &args.target, config.manifest_extension());
    if let Some(name) = &args.name {
        request = request.project_name(name);
    }

    let project = project_service(&config)?.initialize(&request)?;
    info!(manifest = %project.manifest_path.display(), reused = project.reused, "Project ready");
    if !global.is_json() {
        output.project(&project)?;
    }

    let report = match &args.payload {
        Some(payload) => Some(run_merge(&project, payload, &args.merge, &config, &output)?),
        None => None,
    };

    if global.is_json() {
        return output.json("new", &outcome(&project, report));
    }
    if let Some(report) = &report {
        show_report(report, &global, &output)?;
    }
    Ok(())
}

fn outcome(project: &Project, merge: Option<MergeReport>) -> NewOutcome {
    NewOutcome {
        root: project.root.clone(),
        manifest: project.manifest_path.clone(),
        reused: project.reused,
        template_files: project.copied,
        merge,
    }
}

/// The name becomes a file name, so it must be a single plain segment.
fn validate_project_name(name: &str) -> CliResult<()> {
    let reason = if name.trim().is_empty() {
        "name cannot be empty"
    } else if name.starts_with('.') {
        "name cannot start with '.'"
    } else if name.contains(['/', '\\']) {
        "name cannot contain path separators"
    } else {
        return Ok(());
    };
    Err(CliError::invalid_input(format!(
        "invalid project name '{name}': {reason}"
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass() {
        for name in ["Shop", "my-app", "Web_Site2"] {
            assert!(validate_project_name(name).is_ok(), "failed for: {name}");
        }
    }

    #[test]
    fn names_that_are_not_file_stems_fail() {
        for name in ["", " ", ".hidden", "a/b", "a\\b"] {
            assert!(validate_project_name(name).is_err(), "accepted: {name:?}");
        }
    }

    #[test]
    fn outcome_mirrors_project() {
        let project = Project {
            root: "/out".into(),
            manifest_path: "/out/Shop.csproj".into(),
            reused: false,
            copied: 3,
        };
        let json = serde_json::to_value(outcome(&project, None)).unwrap();
        assert_eq!(json["template_files"], 3);
        assert_eq!(json["manifest"], "/out/Shop.csproj");
        assert!(json["merge"].is_null());
    }
}

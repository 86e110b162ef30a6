//! Command handlers.
//!
//! Each handler translates parsed arguments into core requests, calls the
//! services and renders the outcome. Flag/config resolution for merges is
//! shared here because `new --payload` and `merge` run the same merge.

use std::path::{Path, PathBuf};

use tracing::debug;

use graft_adapters::{LocalFilesystem, XmlManifestStore};
use graft_core::{
    application::{MergeReport, MergeRequest, MergeService, Project, ProjectService},
    domain::{DomainValidator, EntryFilter, PathClassifier},
    error::GraftError,
};

use crate::{
    cli::{GlobalArgs, MergeFlags},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod entries;
pub mod init;
pub mod merge;
pub mod new;

pub(crate) fn project_service(config: &AppConfig) -> CliResult<ProjectService> {
    Ok(ProjectService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(XmlManifestStore::new().with_separator(config.include_separator()?)),
    ))
}

pub(crate) fn merge_service(config: &AppConfig) -> CliResult<MergeService> {
    Ok(MergeService::new(
        Box::new(LocalFilesystem::new()),
        PathClassifier::new(config.type_mapping()?),
    ))
}

/// Resolve flags against the configuration into a core merge request.
pub(crate) fn merge_request(
    flags: &MergeFlags,
    source: PathBuf,
    target_root: &Path,
    config: &AppConfig,
) -> CliResult<MergeRequest> {
    let include_case = !flags.include_case_insensitive && config.merge.include_case_sensitive;
    let exclude_case = flags.exclude_case_sensitive || config.merge.exclude_case_sensitive;

    let mut filter = EntryFilter::all();
    for pattern in &flags.include {
        filter = filter
            .include_with(pattern, include_case)
            .map_err(GraftError::from)?;
    }
    for pattern in &flags.exclude {
        filter = filter
            .exclude_with(pattern, exclude_case)
            .map_err(GraftError::from)?;
    }

    let overwrite = if flags.no_overwrite {
        false
    } else {
        flags.overwrite || config.merge.overwrite
    };

    let placeholders =
        config.placeholder_policy(flags.placeholder, flags.placeholder_name.as_deref());
    DomainValidator::validate_placeholder_policy(&placeholders).map_err(GraftError::from)?;

    let mut request = MergeRequest::new(source, target_root)
        .filter(filter)
        .overwrite(overwrite)
        .placeholders(placeholders)
        .dry_run(flags.dry_run);
    if let Some(root) = &flags.root {
        let root = DomainValidator::validate_logical_root(root).map_err(GraftError::from)?;
        request = request.logical_root(root);
    }
    Ok(request)
}

/// Merge `source` into an established project and return the report.
///
/// With `--locate-root` the source is first narrowed to the directory the
/// payload really starts at.
pub(crate) fn run_merge(
    project: &Project,
    source: &Path,
    flags: &MergeFlags,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<MergeReport> {
    let projects = project_service(config)?;
    let source = if flags.locate_root {
        let located = projects.locate_payload_root(source, config.locate.max_depth)?;
        debug!(from = %source.display(), to = %located.display(), "Located payload root");
        located
    } else {
        source.to_path_buf()
    };

    let request = merge_request(flags, source, &project.root, config)?;
    let service = merge_service(config)?;
    let mut manifest = projects.open_manifest(project)?;

    let spinner = output.spinner(&format!("Merging {}", request.source.display()));
    let result = service.merge(&request, manifest.as_mut());
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    Ok(result?)
}

/// Render a merge report in whichever format is active.
pub(crate) fn show_report(
    report: &MergeReport,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<()> {
    output.report(report, global.verbose > 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PlaceholderMode;
    use graft_core::domain::{LogicalPath, PlaceholderPolicy};

    fn flags() -> MergeFlags {
        MergeFlags::default()
    }

    #[test]
    fn defaults_come_from_config() {
        let mut cfg = AppConfig::default();
        cfg.merge.overwrite = true;
        let request = merge_request(&flags(), "/src".into(), Path::new("/p"), &cfg).unwrap();
        assert!(request.overwrite);
        assert!(request.logical_root.is_root());
        assert_eq!(request.placeholders, PlaceholderPolicy::materialize("readme.txt"));
    }

    #[test]
    fn no_overwrite_beats_config() {
        let mut cfg = AppConfig::default();
        cfg.merge.overwrite = true;
        let flags = MergeFlags {
            no_overwrite: true,
            ..flags()
        };
        let request = merge_request(&flags, "/src".into(), Path::new("/p"), &cfg).unwrap();
        assert!(!request.overwrite);
    }

    #[test]
    fn flags_override_config() {
        let flags = MergeFlags {
            root: Some("wwwroot/lib".into()),
            placeholder: Some(PlaceholderMode::Folder),
            dry_run: true,
            ..flags()
        };
        let request =
            merge_request(&flags, "/src".into(), Path::new("/p"), &AppConfig::default()).unwrap();
        assert_eq!(request.logical_root, LogicalPath::parse("wwwroot/lib").unwrap());
        assert_eq!(request.placeholders, PlaceholderPolicy::Folder);
        assert!(request.dry_run);
    }

    #[test]
    fn exclude_is_case_insensitive_by_default() {
        let flags = MergeFlags {
            exclude: vec!["*.RESX".into()],
            ..flags()
        };
        let request =
            merge_request(&flags, "/src".into(), Path::new("/p"), &AppConfig::default()).unwrap();
        assert!(!request.filter.admits(Path::new("/src/b.resx")));
        assert!(request.filter.admits(Path::new("/src/a.ts")));
    }

    #[test]
    fn include_case_flag_relaxes_matching() {
        let flags = MergeFlags {
            include: vec!["*.TS".into()],
            include_case_insensitive: true,
            ..flags()
        };
        let request =
            merge_request(&flags, "/src".into(), Path::new("/p"), &AppConfig::default()).unwrap();
        assert!(request.filter.admits(Path::new("/src/a.ts")));
    }

    #[test]
    fn escaping_root_is_rejected() {
        let flags = MergeFlags {
            root: Some("../outside".into()),
            ..flags()
        };
        let err = merge_request(&flags, "/src".into(), Path::new("/p"), &AppConfig::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_placeholder_name_is_rejected() {
        let flags = MergeFlags {
            placeholder_name: Some("a/b.txt".into()),
            ..flags()
        };
        assert!(
            merge_request(&flags, "/src".into(), Path::new("/p"), &AppConfig::default()).is_err()
        );
    }
}

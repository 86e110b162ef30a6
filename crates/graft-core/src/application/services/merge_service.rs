//! Merge Service - the tree merge engine and empty-directory reconciler.
//!
//! One merge invocation:
//! 1. Index what the manifest already holds
//! 2. Walk the source tree, copying entries under the logical root
//! 3. Append a manifest entry for every file not yet represented
//! 4. Give every directory that ended up with no file a placeholder
//! 5. Save the manifest, only if something was appended
//!
//! Per-file problems are recorded in the [`MergeReport`] and never abort
//! the walk. Running the same merge twice without overwrite is a no-op the
//! second time.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ManifestDocument, WalkEntry},
        services::report::{CopiedFile, FileFailure, MergeReport, SkipReason, SkippedFile},
    },
    domain::{
        DirectoryFileMap, DomainError, DomainValidator as validator, EntryFilter, EntryKind,
        LogicalPath, ManifestEntry, ManifestIndex, PathClassifier, PlaceholderPolicy, TypeMapping,
    },
    error::GraftResult,
};

/// Everything one merge needs besides the manifest itself.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub source: PathBuf,
    /// Physical directory the manifest's logical paths are relative to.
    pub target_root: PathBuf,
    /// Logical directory the source tree lands under.
    pub logical_root: LogicalPath,
    pub filter: EntryFilter,
    pub overwrite: bool,
    pub placeholders: PlaceholderPolicy,
    pub dry_run: bool,
}

impl MergeRequest {
    pub fn new(source: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target_root: target_root.into(),
            logical_root: LogicalPath::root(),
            filter: EntryFilter::all(),
            overwrite: false,
            placeholders: PlaceholderPolicy::default(),
            dry_run: false,
        }
    }

    pub fn logical_root(mut self, root: LogicalPath) -> Self {
        self.logical_root = root;
        self
    }

    pub fn filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn placeholders(mut self, policy: PlaceholderPolicy) -> Self {
        self.placeholders = policy;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Per-invocation bookkeeping, discarded once the manifest is saved.
#[derive(Debug, Clone, Default)]
pub struct MergeState {
    pub index: ManifestIndex,
    pub directories: DirectoryFileMap,
}

impl MergeState {
    pub fn from_entries(entries: &[ManifestEntry], mapping: &TypeMapping) -> Self {
        Self {
            index: ManifestIndex::build(entries, mapping),
            directories: DirectoryFileMap::new(),
        }
    }
}

/// What reconciliation appended, and where it could not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub placeholders: Vec<ManifestEntry>,
    pub failures: Vec<FileFailure>,
}

/// Source and destination of one walked file.
struct Placement<'a> {
    entry: &'a WalkEntry,
    logical: LogicalPath,
    destination: PathBuf,
}

pub struct MergeService {
    filesystem: Box<dyn Filesystem>,
    classifier: PathClassifier,
}

impl MergeService {
    pub fn new(filesystem: Box<dyn Filesystem>, classifier: PathClassifier) -> Self {
        Self {
            filesystem,
            classifier,
        }
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Merge `request.source` into the project owning `manifest`.
    ///
    /// Fails only when the source is missing or unwalkable, the placeholder
    /// policy is invalid, or the manifest cannot be appended to or saved. On
    /// failure the manifest is not saved; files copied so far stay in place.
    #[instrument(
        skip_all,
        fields(
            source = %request.source.display(),
            target = %request.target_root.display(),
            root = %request.logical_root,
            dry_run = request.dry_run
        )
    )]
    pub fn merge(
        &self,
        request: &MergeRequest,
        manifest: &mut dyn ManifestDocument,
    ) -> GraftResult<MergeReport> {
        if !self.filesystem.is_dir(&request.source) {
            return Err(ApplicationError::not_found("source directory", &request.source).into());
        }
        validator::validate_placeholder_policy(&request.placeholders)?;

        let mut report = MergeReport::new(&request.source, &request.target_root, request.dry_run);
        let mut state = MergeState::from_entries(&manifest.entries(), self.classifier.mapping());
        debug!(known = state.index.len(), "Manifest indexed");

        let walk = self.filesystem.walk(&request.source)?;
        for unreadable in walk.unreadable {
            warn!(path = %unreadable.path.display(), reason = %unreadable.reason, "Unreadable entry");
            report.failures.push(unreadable.into());
        }

        for entry in &walk.entries {
            if !request.filter.admits(&entry.path) {
                report.filtered += 1;
                continue;
            }

            let logical = match LogicalPath::from_relative(&entry.relative) {
                Ok(relative) => request.logical_root.join(&relative),
                Err(e) => {
                    warn!(path = %entry.path.display(), error = %e, "Skipping entry");
                    report.failures.push(FileFailure {
                        path: entry.path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let destination = request.target_root.join(logical.to_path_buf());
            let placement = Placement {
                entry,
                logical,
                destination,
            };

            if entry.is_dir() {
                self.merge_directory(&placement, request, &mut state, &mut report);
            } else {
                self.merge_file(&placement, request, &mut state, manifest, &mut report)?;
            }
        }

        let outcome = self.reconcile_empty_directories(
            &mut state,
            manifest,
            &request.placeholders,
            &request.target_root,
            request.dry_run,
        )?;
        report.placeholders = outcome.placeholders;
        report.failures.extend(outcome.failures);

        if !request.dry_run && report.new_entry_count() > 0 {
            manifest.save()?;
            report.manifest_saved = true;
        }

        info!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            entries = report.entries_added.len(),
            placeholders = report.placeholders.len(),
            saved = report.manifest_saved,
            "Merge completed"
        );
        Ok(report)
    }

    /// Give every tracked directory without files exactly one manifest entry.
    ///
    /// Directories already present in the index (a folder marker, or any
    /// recorded content beneath them) are left alone, which keeps repeated
    /// runs idempotent.
    #[instrument(skip_all, fields(policy = %policy))]
    pub fn reconcile_empty_directories(
        &self,
        state: &mut MergeState,
        manifest: &mut dyn ManifestDocument,
        policy: &PlaceholderPolicy,
        target_root: &Path,
        dry_run: bool,
    ) -> GraftResult<ReconcileOutcome> {
        let mut outcome = ReconcileOutcome::default();
        let empty: Vec<LogicalPath> = state.directories.empty_directories().cloned().collect();

        for dir in empty {
            if state.index.is_present(&dir) {
                state.directories.mark_has_files(&dir);
                continue;
            }

            let entry = match policy {
                PlaceholderPolicy::Folder => {
                    ManifestEntry::new(self.classifier.classify_directory(), dir.clone())
                }
                PlaceholderPolicy::File { file_name } => {
                    let placeholder = dir.child(file_name)?;
                    if state.index.is_present(&placeholder) {
                        state.directories.mark_has_files(&dir);
                        continue;
                    }
                    let physical = target_root.join(placeholder.to_path_buf());
                    if let Err(reason) = self.materialize_placeholder(&physical, dry_run) {
                        warn!(path = %physical.display(), %reason, "Placeholder not created");
                        outcome.failures.push(FileFailure {
                            path: physical,
                            reason,
                        });
                        continue;
                    }
                    ManifestEntry::new(EntryKind::Content, placeholder)
                }
            };

            if !dry_run {
                manifest.append_entry(&entry)?;
            }
            debug!(entry = %entry, "Placeholder recorded");
            state.index.mark_present(&entry.include);
            state.directories.mark_has_files(&dir);
            outcome.placeholders.push(entry);
        }

        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn merge_directory(
        &self,
        placement: &Placement<'_>,
        request: &MergeRequest,
        state: &mut MergeState,
        report: &mut MergeReport,
    ) {
        let destination = &placement.destination;
        if !self.filesystem.is_dir(destination) {
            if !request.dry_run {
                if let Err(e) = self.filesystem.create_dir_all(destination) {
                    warn!(path = %destination.display(), error = %e, "Directory not created");
                    report.failures.push(FileFailure {
                        path: destination.clone(),
                        reason: e.to_string(),
                    });
                    return;
                }
            }
            report.directories_created += 1;
        }

        let known = state.index.is_present(&placement.logical);
        state.directories.track(&placement.logical, known);
    }

    fn merge_file(
        &self,
        placement: &Placement<'_>,
        request: &MergeRequest,
        state: &mut MergeState,
        manifest: &mut dyn ManifestDocument,
        report: &mut MergeReport,
    ) -> GraftResult<()> {
        let source = &placement.entry.path;
        let destination = &placement.destination;
        let exists = self.filesystem.exists(destination);

        if exists && !request.overwrite {
            debug!(path = %destination.display(), "Destination exists, not copying");
            report.skipped.push(SkippedFile {
                source: source.clone(),
                destination: destination.clone(),
                reason: SkipReason::DestinationExists,
            });
        } else {
            if !request.dry_run {
                if let Err(e) = self.filesystem.copy_file(source, destination) {
                    warn!(path = %source.display(), error = %e, "Copy failed");
                    report.failures.push(FileFailure {
                        path: source.clone(),
                        reason: e.to_string(),
                    });
                    return Ok(());
                }
            }
            debug!(from = %source.display(), to = %destination.display(), "Copied");
            report.copied.push(CopiedFile {
                source: source.clone(),
                destination: destination.clone(),
                replaced: exists,
            });
        }

        if !state.index.is_present(&placement.logical) {
            let entry = ManifestEntry::new(
                self.classifier.classify(&placement.logical),
                placement.logical.clone(),
            );
            if !request.dry_run {
                manifest.append_entry(&entry)?;
            }
            state.index.mark_present(&entry.include);
            report.entries_added.push(entry);
        }
        if let Some(parent) = placement.logical.parent() {
            state.directories.mark_has_files(&parent);
        }
        Ok(())
    }

    /// Create the placeholder file; an existing directory in its place is a
    /// collision.
    fn materialize_placeholder(&self, physical: &Path, dry_run: bool) -> Result<(), String> {
        if self.filesystem.is_dir(physical) {
            return Err(DomainError::StructuralInconsistency {
                path: physical.display().to_string(),
                reason: "a directory occupies the placeholder file's path".into(),
            }
            .to_string());
        }
        if dry_run {
            return Ok(());
        }
        self.filesystem
            .touch(physical)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

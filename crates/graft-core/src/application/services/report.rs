//! Merge report - what a merge did, file by file.

use std::path::PathBuf;

use serde::Serialize;

use crate::application::ports::UnreadableEntry;
use crate::domain::ManifestEntry;

/// A file copied into the target tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// An existing destination was overwritten.
    pub replaced: bool,
}

/// Why a file was not copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The destination exists and overwriting is off.
    DestinationExists,
}

/// A file left untouched by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub reason: SkipReason,
}

/// A per-entry failure; the walk continued past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl From<UnreadableEntry> for FileFailure {
    fn from(entry: UnreadableEntry) -> Self {
        Self {
            path: entry.path,
            reason: entry.reason,
        }
    }
}

/// Outcome of one merge invocation.
///
/// Skips and failures are informational: a merge that returns a report
/// succeeded, whatever these lists hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub dry_run: bool,
    pub copied: Vec<CopiedFile>,
    pub skipped: Vec<SkippedFile>,
    pub failures: Vec<FileFailure>,
    /// Entries appended for walked files.
    pub entries_added: Vec<ManifestEntry>,
    /// Entries appended for otherwise-empty directories.
    pub placeholders: Vec<ManifestEntry>,
    pub directories_created: usize,
    /// Entries rejected by the include/exclude filter.
    pub filtered: usize,
    pub manifest_saved: bool,
}

impl MergeReport {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            dry_run,
            ..Self::default()
        }
    }

    /// Number of manifest entries this merge appended.
    pub fn new_entry_count(&self) -> usize {
        self.entries_added.len() + self.placeholders.len()
    }

    /// `true` when the merge copied nothing and appended nothing.
    pub fn is_noop(&self) -> bool {
        self.copied.is_empty() && self.new_entry_count() == 0 && self.directories_created == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// All appended entries, file entries first.
    pub fn all_entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries_added.iter().chain(self.placeholders.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryKind, LogicalPath};

    #[test]
    fn fresh_report_is_noop() {
        let report = MergeReport::new("/src", "/dst", false);
        assert!(report.is_noop());
        assert!(!report.has_failures());
    }

    #[test]
    fn placeholders_count_as_new_entries() {
        let mut report = MergeReport::new("/src", "/dst", false);
        report.placeholders.push(ManifestEntry::new(
            EntryKind::Folder,
            LogicalPath::parse("empty").unwrap(),
        ));
        assert_eq!(report.new_entry_count(), 1);
        assert!(!report.is_noop());
    }
}

//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `graft-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::ManifestEntry;
use crate::error::GraftResult;

/// Kind of a walked filesystem entry. Symlinks and other special files are
/// never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// One entry found under a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute (or caller-rooted) path of the entry.
    pub path: PathBuf,
    /// Path relative to the walked root.
    pub relative: PathBuf,
    pub entry_type: EntryType,
}

impl WalkEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

/// An entry the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of walking a tree: readable entries in depth-first pre-order
/// (a directory always precedes its contents), plus anything unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub entries: Vec<WalkEntry>,
    pub unreadable: Vec<UnreadableEntry>,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `graft_adapters::filesystem::LocalFilesystem` (production)
/// - `graft_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GraftResult<()>;

    /// Copy a file, replacing `to` if it exists and creating its parents.
    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()>;

    /// Create an empty file unless one already exists.
    ///
    /// Returns `true` when the file was created by this call.
    fn touch(&self, path: &Path) -> GraftResult<bool>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Recursively list everything below `root`, sorted by name within each
    /// directory. Fails only if `root` itself cannot be read.
    fn walk(&self, root: &Path) -> GraftResult<WalkOutcome>;

    /// List the immediate children of `dir`, sorted by name.
    fn read_dir(&self, dir: &Path) -> GraftResult<Vec<WalkEntry>>;

    /// Rename a file.
    fn rename(&self, from: &Path, to: &Path) -> GraftResult<()>;
}

/// Port for a loaded project manifest.
///
/// Implemented by:
/// - `graft_adapters::manifest::XmlManifest` (production)
/// - `graft_adapters::manifest::InMemoryManifest` (testing)
pub trait ManifestDocument {
    /// Where the document is persisted.
    fn location(&self) -> &Path;

    /// Every item entry with an `Include` path, in document order.
    ///
    /// Includes structural items (references and the like); callers filter
    /// by kind.
    fn entries(&self) -> Vec<ManifestEntry>;

    /// Append an entry to the document's item group for project content.
    fn append_entry(&mut self, entry: &ManifestEntry) -> GraftResult<()>;

    /// Persist the document to [`ManifestDocument::location`].
    fn save(&mut self) -> GraftResult<()>;
}

/// Port for opening manifest documents.
pub trait ManifestStore: Send + Sync {
    /// Load the manifest at `path`.
    ///
    /// Fails with a not-found error when `path` does not exist.
    fn open(&self, path: &Path) -> GraftResult<Box<dyn ManifestDocument>>;
}

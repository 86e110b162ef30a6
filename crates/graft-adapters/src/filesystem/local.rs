//! Local filesystem adapter using std::fs and walkdir.

use std::fs;
use std::io;
use std::path::Path;

use graft_core::{
    application::{
        ApplicationError,
        ports::{EntryType, Filesystem, UnreadableEntry, WalkEntry, WalkOutcome},
    },
    error::{GraftError, GraftResult},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
///
/// Symbolic links are never followed and never reported by walks.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent)?;
        }
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn touch(&self, path: &Path) -> GraftResult<bool> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_file() => Ok(false),
            Err(e) => Err(map_io_error(path, e, "create file")),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk(&self, root: &Path) -> GraftResult<WalkOutcome> {
        if !root.is_dir() {
            return Err(ApplicationError::not_found("directory", root).into());
        }

        let mut outcome = WalkOutcome::default();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    outcome.unreadable.push(UnreadableEntry {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let entry_type = if entry.file_type().is_dir() {
                EntryType::Directory
            } else if entry.file_type().is_file() {
                EntryType::File
            } else {
                trace!(path = %entry.path().display(), "Skipping special file");
                continue;
            };
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            outcome.entries.push(WalkEntry {
                path: entry.path().to_path_buf(),
                relative: relative.to_path_buf(),
                entry_type,
            });
        }
        Ok(outcome)
    }

    fn read_dir(&self, dir: &Path) -> GraftResult<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        let listing = fs::read_dir(dir).map_err(|e| map_io_error(dir, e, "read directory"))?;
        for item in listing {
            let item = item.map_err(|e| map_io_error(dir, e, "read directory entry"))?;
            let file_type = item
                .file_type()
                .map_err(|e| map_io_error(&item.path(), e, "read file type"))?;
            let entry_type = if file_type.is_dir() {
                EntryType::Directory
            } else if file_type.is_file() {
                EntryType::File
            } else {
                continue;
            };
            entries.push(WalkEntry {
                path: item.path(),
                relative: item.file_name().into(),
                entry_type,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> GraftResult<()> {
        fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GraftError {
    if e.kind() == io::ErrorKind::NotFound {
        return ApplicationError::not_found("path", path).into();
    }
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn walk_is_sorted_pre_order_and_relative() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("b/inner")).unwrap();
        fs::write(tmp.path().join("b/inner/x.txt"), "x").unwrap();
        fs::write(tmp.path().join("a.ts"), "a").unwrap();

        let outcome = LocalFilesystem::new().walk(tmp.path()).unwrap();
        let relative: Vec<_> = outcome
            .entries
            .iter()
            .map(|e| e.relative.to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(relative, vec!["a.ts", "b", "b/inner", "b/inner/x.txt"]);
        assert!(outcome.entries[1].is_dir());
        assert!(outcome.unreadable.is_empty());
    }

    #[test]
    fn walk_of_missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .walk(&tmp.path().join("nope"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn copy_creates_parents_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("src.txt");
        let to = tmp.path().join("deep/er/dst.txt");
        fs::write(&from, "new").unwrap();

        let fs_adapter = LocalFilesystem::new();
        fs_adapter.copy_file(&from, &to).unwrap();
        fs::write(&from, "newer").unwrap();
        fs_adapter.copy_file(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "newer");
    }

    #[test]
    fn touch_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty/readme.txt");
        let fs_adapter = LocalFilesystem::new();

        assert!(fs_adapter.touch(&path).unwrap());
        fs::write(&path, "kept").unwrap();
        assert!(!fs_adapter.touch(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "kept");
    }

    #[test]
    fn touch_on_a_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new().touch(tmp.path()).unwrap_err();
        assert!(!err.is_not_found());
    }
}

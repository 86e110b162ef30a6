//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use graft_core::{
    application::{
        ApplicationError,
        ports::{EntryType, Filesystem, WalkEntry, WalkOutcome},
    },
    error::GraftResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// service.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn add_parents(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.add_dir_all(parent);
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parents (testing helper).
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) -> GraftResult<()> {
        let path = path.as_ref();
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        if inner.directories.contains(path) {
            return Err(ApplicationError::filesystem(path, "is a directory").into());
        }
        inner.add_parents(path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }

    fn entry(root: &Path, path: &Path, entry_type: EntryType) -> Option<WalkEntry> {
        let relative = path.strip_prefix(root).ok()?;
        Some(WalkEntry {
            path: path.to_path_buf(),
            relative: relative.to_path_buf(),
            entry_type,
        })
    }

    fn all_under(&self, root: &Path, direct_only: bool) -> GraftResult<Vec<WalkEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        let wanted = |p: &Path| {
            p != root
                && p.starts_with(root)
                && (!direct_only || p.parent() == Some(root))
        };

        let mut entries: Vec<WalkEntry> = inner
            .directories
            .iter()
            .filter(|p| wanted(p))
            .filter_map(|p| Self::entry(root, p, EntryType::Directory))
            .chain(
                inner
                    .files
                    .keys()
                    .filter(|p| wanted(p))
                    .filter_map(|p| Self::entry(root, p, EntryType::File)),
            )
            .collect();
        // Component-wise ordering puts every directory before its contents.
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::filesystem(path, "a file exists at this path").into());
        }
        inner.add_dir_all(path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| ApplicationError::not_found("file", from))?;
        if inner.directories.contains(to) {
            return Err(ApplicationError::filesystem(to, "is a directory").into());
        }
        inner.add_parents(to);
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn touch(&self, path: &Path) -> GraftResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        if inner.directories.contains(path) {
            return Err(ApplicationError::filesystem(path, "is a directory").into());
        }
        if inner.files.contains_key(path) {
            return Ok(false);
        }
        inner.add_parents(path);
        inner.files.insert(path.to_path_buf(), String::new());
        Ok(true)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn walk(&self, root: &Path) -> GraftResult<WalkOutcome> {
        if !self.is_dir(root) {
            return Err(ApplicationError::not_found("directory", root).into());
        }
        Ok(WalkOutcome {
            entries: self.all_under(root, false)?,
            unreadable: Vec::new(),
        })
    }

    fn read_dir(&self, dir: &Path) -> GraftResult<Vec<WalkEntry>> {
        if !self.is_dir(dir) {
            return Err(ApplicationError::not_found("directory", dir).into());
        }
        self.all_under(dir, true)
    }

    fn rename(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        let content = inner
            .files
            .remove(from)
            .ok_or_else(|| ApplicationError::not_found("file", from))?;
        inner.add_parents(to);
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_lists_directories_before_their_contents() {
        let fs = MemoryFilesystem::new();
        fs.write_file("/src/z.txt", "").unwrap();
        fs.write_file("/src/a/b.txt", "").unwrap();
        fs.create_dir_all(Path::new("/src/empty")).unwrap();

        let outcome = fs.walk(Path::new("/src")).unwrap();
        let relative: Vec<_> = outcome
            .entries
            .iter()
            .map(|e| e.relative.to_string_lossy().into_owned())
            .collect();

        assert_eq!(relative, vec!["a", "a/b.txt", "empty", "z.txt"]);
    }

    #[test]
    fn read_dir_is_shallow() {
        let fs = MemoryFilesystem::new();
        fs.write_file("/r/one/two/three.txt", "").unwrap();
        let entries = fs.read_dir(Path::new("/r")).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir());
    }

    #[test]
    fn touch_keeps_existing_content() {
        let fs = MemoryFilesystem::new();
        fs.write_file("/d/readme.txt", "hello").unwrap();
        assert!(!fs.touch(Path::new("/d/readme.txt")).unwrap());
        assert_eq!(
            fs.read_file(Path::new("/d/readme.txt")).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn copy_missing_source_is_not_found() {
        let fs = MemoryFilesystem::new();
        let err = fs
            .copy_file(Path::new("/nope"), Path::new("/out"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

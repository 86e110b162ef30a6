//! Fakes for service tests. The real adapters live in `graft-adapters`,
//! which depends on this crate and so cannot be used here.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::{
        ApplicationError,
        ports::{EntryType, Filesystem, ManifestDocument, ManifestStore, WalkEntry, WalkOutcome},
    },
    domain::ManifestEntry,
    error::GraftResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(String),
}

/// Shared in-memory tree; clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct FakeFs {
    nodes: Arc<Mutex<BTreeMap<PathBuf, Node>>>,
    pub copies: Arc<Mutex<usize>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.nodes
            .lock()
            .unwrap()
            .insert(path, Node::File(content.into()));
        self
    }

    pub fn with_dir(self, path: &str) -> Self {
        let path = PathBuf::from(path);
        self.add_parents(&path);
        self.nodes.lock().unwrap().insert(path, Node::Dir);
        self
    }

    pub fn read(&self, path: &str) -> Option<String> {
        match self.nodes.lock().unwrap().get(Path::new(path)) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn copy_count(&self) -> usize {
        *self.copies.lock().unwrap()
    }

    fn add_parents(&self, path: &Path) {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() || ancestor == Path::new("/") {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    fn entry(root: &Path, path: &Path, node: &Node) -> WalkEntry {
        WalkEntry {
            path: path.to_path_buf(),
            relative: path.strip_prefix(root).unwrap().to_path_buf(),
            entry_type: match node {
                Node::Dir => EntryType::Directory,
                Node::File(_) => EntryType::File,
            },
        }
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        self.add_parents(path);
        self.nodes
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), Node::Dir);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let content = match self.nodes.lock().unwrap().get(from) {
            Some(Node::File(content)) => content.clone(),
            _ => return Err(ApplicationError::not_found("file", from).into()),
        };
        self.add_parents(to);
        self.nodes
            .lock()
            .unwrap()
            .insert(to.to_path_buf(), Node::File(content));
        *self.copies.lock().unwrap() += 1;
        Ok(())
    }

    fn touch(&self, path: &Path) -> GraftResult<bool> {
        self.add_parents(path);
        let mut nodes = self.nodes.lock().unwrap();
        if nodes.contains_key(path) {
            return Ok(false);
        }
        nodes.insert(path.to_path_buf(), Node::File(String::new()));
        Ok(true)
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.lock().unwrap().get(path), Some(Node::Dir))
    }

    fn walk(&self, root: &Path) -> GraftResult<WalkOutcome> {
        let nodes = self.nodes.lock().unwrap();
        // PathBuf ordering is per component, which is depth-first pre-order.
        let entries = nodes
            .iter()
            .filter(|(p, _)| p.starts_with(root) && p.as_path() != root)
            .map(|(p, n)| Self::entry(root, p, n))
            .collect();
        Ok(WalkOutcome {
            entries,
            unreadable: Vec::new(),
        })
    }

    fn read_dir(&self, dir: &Path) -> GraftResult<Vec<WalkEntry>> {
        let nodes = self.nodes.lock().unwrap();
        Ok(nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .map(|(p, n)| Self::entry(dir, p, n))
            .collect())
    }

    fn rename(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes
            .remove(from)
            .ok_or_else(|| ApplicationError::not_found("file", from))?;
        nodes.insert(to.to_path_buf(), node);
        Ok(())
    }
}

/// Manifest that only counts saves.
#[derive(Debug, Default)]
pub struct FakeManifest {
    pub location: PathBuf,
    pub entries: Vec<ManifestEntry>,
    pub saves: usize,
}

impl FakeManifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self {
            location: PathBuf::from("/project/App.csproj"),
            entries,
            saves: 0,
        }
    }

    /// Entries rendered as `Kind:/path`, sorted, for set comparisons.
    pub fn rendered(&self) -> Vec<String> {
        let mut out: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        out.sort();
        out
    }
}

impl ManifestDocument for FakeManifest {
    fn location(&self) -> &Path {
        &self.location
    }

    fn entries(&self) -> Vec<ManifestEntry> {
        self.entries.clone()
    }

    fn append_entry(&mut self, entry: &ManifestEntry) -> GraftResult<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn save(&mut self) -> GraftResult<()> {
        self.saves += 1;
        Ok(())
    }
}

/// Opens a [`FakeManifest`] for any file present in the backing [`FakeFs`].
#[derive(Debug, Clone)]
pub struct FakeStore {
    pub fs: FakeFs,
}

impl ManifestStore for FakeStore {
    fn open(&self, path: &Path) -> GraftResult<Box<dyn ManifestDocument>> {
        if self.fs.read(&path.to_string_lossy()).is_none() {
            return Err(ApplicationError::not_found("manifest", path).into());
        }
        let mut manifest = FakeManifest::new(Vec::new());
        manifest.location = path.to_path_buf();
        Ok(Box::new(manifest))
    }
}

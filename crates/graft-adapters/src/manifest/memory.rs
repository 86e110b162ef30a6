//! In-memory manifest for testing.

use std::path::{Path, PathBuf};

use graft_core::{
    application::ports::ManifestDocument, domain::ManifestEntry, error::GraftResult,
};

/// Entry list with a save counter; nothing is written anywhere.
#[derive(Debug, Clone, Default)]
pub struct InMemoryManifest {
    location: PathBuf,
    entries: Vec<ManifestEntry>,
    saves: usize,
}

impl InMemoryManifest {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_entries(mut self, entries: Vec<ManifestEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Number of times [`ManifestDocument::save`] was called.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Entries as `Kind:/path`, sorted.
    pub fn rendered(&self) -> Vec<String> {
        let mut rendered: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        rendered.sort();
        rendered
    }
}

impl ManifestDocument for InMemoryManifest {
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

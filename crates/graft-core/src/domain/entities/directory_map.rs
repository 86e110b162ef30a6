use std::collections::BTreeMap;

use crate::domain::entities::common::LogicalPath;

/// Tracks, per walked logical directory, whether any file is recorded
/// directly beneath it.
///
/// Slots start out `false` when a directory is first seen and flip to `true`
/// the moment a direct file entry is recorded under it (or if the manifest
/// already held something there). Ordered by key so reconciliation output is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFileMap {
    slots: BTreeMap<String, DirectorySlot>,
}

#[derive(Debug, Clone)]
struct DirectorySlot {
    path: LogicalPath,
    has_files: bool,
}

impl DirectoryFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `dir`. An existing slot is never reset to `false`.
    pub fn track(&mut self, dir: &LogicalPath, has_files: bool) {
        self.slots
            .entry(dir.key().to_string())
            .and_modify(|slot| slot.has_files |= has_files)
            .or_insert_with(|| DirectorySlot {
                path: dir.clone(),
                has_files,
            });
    }

    /// Flag `dir` as holding at least one file. Untracked directories are
    /// ignored: only walked directories are reconciled.
    pub fn mark_has_files(&mut self, dir: &LogicalPath) {
        if let Some(slot) = self.slots.get_mut(dir.key()) {
            slot.has_files = true;
        }
    }

    pub fn has_files(&self, dir: &LogicalPath) -> Option<bool> {
        self.slots.get(dir.key()).map(|slot| slot.has_files)
    }

    /// Directories with no recorded file, in key order.
    pub fn empty_directories(&self) -> impl Iterator<Item = &LogicalPath> {
        self.slots
            .values()
            .filter(|slot| !slot.has_files)
            .map(|slot| &slot.path)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

use std::fmt;

use serde::Serialize;

use crate::domain::{entities::common::LogicalPath, value_objects::EntryKind};

/// One item of the project manifest: an element kind plus its `Include` path.
///
/// Entries are never rewritten once appended; reconciliation only ever adds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ManifestEntry {
    pub kind: EntryKind,
    pub include: LogicalPath,
}

impl ManifestEntry {
    pub fn new(kind: EntryKind, include: LogicalPath) -> Self {
        Self { kind, include }
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.include)
    }
}

use crate::domain::{
    entities::{common::LogicalPath, type_mapping::TypeMapping},
    value_objects::EntryKind,
};

/// Maps a logical path to the manifest entry kind it should be recorded as.
///
/// Total and deterministic: every path resolves to exactly one kind, falling
/// back to the mapping's `default` kind.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    mapping: TypeMapping,
}

impl PathClassifier {
    pub fn new(mapping: TypeMapping) -> Self {
        Self { mapping }
    }

    /// Kind for a file path, keyed on the text after its final `.`.
    pub fn classify(&self, path: &LogicalPath) -> EntryKind {
        self.classify_suffix(path.suffix())
    }

    pub fn classify_suffix(&self, suffix: Option<&str>) -> EntryKind {
        suffix
            .and_then(|s| self.mapping.lookup(s))
            .unwrap_or_else(|| self.mapping.default_kind())
            .clone()
    }

    /// Kind used for bare directory records.
    pub fn classify_directory(&self) -> EntryKind {
        self.mapping.folder_kind().clone()
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }
}

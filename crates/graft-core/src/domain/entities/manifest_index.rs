use std::collections::HashSet;

use crate::domain::entities::{
    common::LogicalPath, manifest_entry::ManifestEntry, type_mapping::TypeMapping,
};

/// Set of logical paths already represented in a manifest.
///
/// Built once per merge from the manifest's existing entries and then
/// updated as entries are appended. Every recorded entry also records its
/// immediate parent directory, so "does this directory already hold
/// something?" is a single lookup.
///
/// Keys are [`LogicalPath::key`] values (lower-cased, `/`-delimited).
#[derive(Debug, Clone, Default)]
pub struct ManifestIndex {
    present: HashSet<String>,
}

impl ManifestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every entry whose kind `mapping` recognizes (see
    /// [`TypeMapping::recognizes`]).
    ///
    /// Other elements (references, imports) are structural and do not make a
    /// path "present".
    pub fn build<'a, I>(entries: I, mapping: &TypeMapping) -> Self
    where
        I: IntoIterator<Item = &'a ManifestEntry>,
    {
        let mut index = Self::new();
        for entry in entries {
            if mapping.recognizes(&entry.kind) {
                index.mark_present(&entry.include);
            }
        }
        index
    }

    /// Case-insensitive exact match.
    pub fn is_present(&self, path: &LogicalPath) -> bool {
        self.present.contains(path.key())
    }

    /// Record `path` and its parent directory. Returns `true` if `path`
    /// itself was not yet present.
    pub fn mark_present(&mut self, path: &LogicalPath) -> bool {
        if let Some(parent) = path.parent() {
            self.present.insert(parent.key().to_string());
        }
        self.present.insert(path.key().to_string())
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EntryKind;

    fn entry(kind: EntryKind, path: &str) -> ManifestEntry {
        ManifestEntry::new(kind, LogicalPath::parse(path).unwrap())
    }

    fn lp(path: &str) -> LogicalPath {
        LogicalPath::parse(path).unwrap()
    }

    #[test]
    fn build_records_entries_and_their_parents() {
        let entries = vec![
            entry(EntryKind::Content, "Scripts\\lib\\app.ts"),
            entry(EntryKind::Folder, "Empty"),
        ];
        let index = ManifestIndex::build(&entries, &TypeMapping::default());

        assert!(index.is_present(&lp("scripts/LIB/App.ts")));
        assert!(index.is_present(&lp("Scripts/lib")));
        assert!(index.is_present(&lp("Empty")));
        // Only the immediate parent is marked.
        assert!(!index.is_present(&lp("Scripts")));
    }

    #[test]
    fn unrecognized_kinds_are_structural() {
        let entries = vec![entry(EntryKind::Custom("Reference".into()), "System.Web")];
        let index = ManifestIndex::build(&entries, &TypeMapping::default());
        assert!(!index.is_present(&lp("System.Web")));
    }

    #[test]
    fn builtin_kinds_outside_the_mapping_are_indexed() {
        let entries = vec![
            entry(EntryKind::None, "web.config"),
            entry(EntryKind::Compile, "Properties/AssemblyInfo.cs"),
        ];
        let index = ManifestIndex::build(&entries, &TypeMapping::default());
        assert!(index.is_present(&lp("Web.config")));
        assert!(index.is_present(&lp("properties/assemblyinfo.cs")));
    }

    #[test]
    fn case_folding_that_changes_length_is_indexed() {
        let entries = vec![entry(EntryKind::Content, "İ/x.txt")];
        let index = ManifestIndex::build(&entries, &TypeMapping::default());
        assert!(index.is_present(&lp("İ/x.txt")));
        assert!(index.is_present(&lp("İ")));
        assert!(index.is_present(&lp("i\u{307}/X.TXT")));
    }

    #[test]
    fn mark_present_is_idempotent() {
        let mut index = ManifestIndex::new();
        assert!(index.mark_present(&lp("a/b.txt")));
        assert!(!index.mark_present(&lp("A/B.TXT")));
        assert_eq!(index.len(), 2);
    }
}

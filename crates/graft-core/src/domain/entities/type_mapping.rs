use std::collections::BTreeMap;

use crate::domain::{error::DomainError, value_objects::EntryKind};

/// Pseudo-suffix resolving the kind used for directory records.
pub const FOLDER_SUFFIX: &str = "folder";
/// Pseudo-suffix resolving the kind used when no suffix matches.
pub const DEFAULT_SUFFIX: &str = "default";

/// Immutable suffix → [`EntryKind`] table.
///
/// Invariants:
/// - suffix keys are lower-cased and carry no leading `.`
/// - exactly one kind per suffix
/// - the `folder` and `default` pseudo-suffixes are always present
///
/// Build one with [`TypeMapping::builder`] or take [`TypeMapping::default`];
/// it is handed to the classifier at construction, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    kinds: BTreeMap<String, EntryKind>,
}

impl TypeMapping {
    pub fn builder() -> TypeMappingBuilder {
        TypeMappingBuilder::default()
    }

    /// Build from `(suffix, kind)` pairs, e.g. a configuration table.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, EntryKind)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::builder(), |b, (suffix, kind)| b.map(suffix, kind))
            .build()
    }

    /// Kind registered for `suffix`, if any. Lookup ignores case.
    pub fn lookup(&self, suffix: &str) -> Option<&EntryKind> {
        self.kinds.get(&normalize_suffix(suffix))
    }

    pub fn default_kind(&self) -> &EntryKind {
        // Presence is checked in `TypeMappingBuilder::build`.
        &self.kinds[DEFAULT_SUFFIX]
    }

    pub fn folder_kind(&self) -> &EntryKind {
        &self.kinds[FOLDER_SUFFIX]
    }

    /// Whether `kind` names an item that makes its path "present": any
    /// built-in item kind, or a custom kind this mapping can produce.
    ///
    /// Other custom elements (references, imports, ...) are structural nodes
    /// the merge never touches.
    pub fn recognizes(&self, kind: &EntryKind) -> bool {
        kind.is_builtin() || self.kinds.values().any(|k| k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryKind)> {
        self.kinds.iter().map(|(s, k)| (s.as_str(), k))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        let mut kinds = BTreeMap::new();
        kinds.insert("ts".to_string(), EntryKind::TypeScriptCompile);
        kinds.insert("resx".to_string(), EntryKind::EmbeddedResource);
        kinds.insert(FOLDER_SUFFIX.to_string(), EntryKind::Folder);
        kinds.insert(DEFAULT_SUFFIX.to_string(), EntryKind::Content);
        Self { kinds }
    }
}

/// Builder for [`TypeMapping`].
///
/// Starts empty; `folder` falls back to [`EntryKind::Folder`] when omitted,
/// `default` must be given explicitly unless [`TypeMappingBuilder::with_defaults`]
/// seeded it.
#[derive(Debug, Default)]
pub struct TypeMappingBuilder {
    entries: Vec<(String, EntryKind)>,
}

impl TypeMappingBuilder {
    /// Seed with the built-in table so callers only list overrides.
    pub fn with_defaults(mut self) -> Self {
        for (suffix, kind) in TypeMapping::default().kinds {
            self.entries.push((suffix, kind));
        }
        self
    }

    pub fn map(mut self, suffix: impl Into<String>, kind: EntryKind) -> Self {
        self.entries.push((suffix.into(), kind));
        self
    }

    pub fn build(self) -> Result<TypeMapping, DomainError> {
        let mut kinds: BTreeMap<String, EntryKind> = BTreeMap::new();

        for (raw, kind) in self.entries {
            let suffix = normalize_suffix(&raw);
            if suffix.is_empty() {
                return Err(DomainError::InvalidTypeMapping(format!(
                    "empty suffix mapped to '{kind}'"
                )));
            }
            if suffix.contains(['/', '\\']) {
                return Err(DomainError::InvalidTypeMapping(format!(
                    "suffix '{raw}' contains a path separator"
                )));
            }
            // Later entries override earlier ones, which is what makes
            // `with_defaults().map(..)` an override.
            kinds.insert(suffix, kind);
        }

        kinds
            .entry(FOLDER_SUFFIX.to_string())
            .or_insert(EntryKind::Folder);

        if !kinds.contains_key(DEFAULT_SUFFIX) {
            return Err(DomainError::InvalidTypeMapping(
                "no 'default' kind configured for unmatched suffixes".into(),
            ));
        }

        Ok(TypeMapping { kinds })
    }
}

fn normalize_suffix(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}

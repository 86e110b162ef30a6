//! Domain value objects: EntryKind, PlaceholderPolicy.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. The
//! suffix → kind table lives in `entities::type_mapping`; this file only
//! defines the types, their string representations, and their parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── EntryKind ─────────────────────────────────────────────────────────────────

/// Classification tag of a manifest entry.
///
/// The kind is written as the element's local name in the manifest
/// (`<Content Include="..."/>`), so any name a manifest uses can be carried
/// through [`EntryKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryKind {
    /// Copied verbatim to the output.
    Content,
    /// Embedded into the compiled assembly.
    EmbeddedResource,
    /// Compiled by the TypeScript toolchain.
    TypeScriptCompile,
    /// Compiled by the project's own compiler.
    Compile,
    /// Tracked but not processed.
    None,
    /// A bare directory record with no file behind it.
    Folder,
    /// Any other element name found in a manifest or configuration.
    Custom(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Content => "Content",
            Self::EmbeddedResource => "EmbeddedResource",
            Self::TypeScriptCompile => "TypeScriptCompile",
            Self::Compile => "Compile",
            Self::None => "None",
            Self::Folder => "Folder",
            Self::Custom(name) => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }

    /// Every variant except [`EntryKind::Custom`].
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(DomainError::UnknownEntryKind(s.to_string()));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "content" => Self::Content,
            "embeddedresource" => Self::EmbeddedResource,
            "typescriptcompile" => Self::TypeScriptCompile,
            "compile" => Self::Compile,
            "none" => Self::None,
            "folder" => Self::Folder,
            _ => Self::Custom(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for EntryKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        kind.as_str().to_string()
    }
}

// ── PlaceholderPolicy ─────────────────────────────────────────────────────────

/// File name used when a placeholder file is materialized and none is given.
pub const DEFAULT_PLACEHOLDER_NAME: &str = "readme.txt";

/// How an otherwise-empty directory is represented after a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    /// Write only a `Folder` manifest record for the directory.
    Folder,
    /// Create an empty file inside the directory and record it as `Content`.
    File { file_name: String },
}

impl PlaceholderPolicy {
    pub fn materialize(file_name: impl Into<String>) -> Self {
        Self::File {
            file_name: file_name.into(),
        }
    }

    pub fn placeholder_name(&self) -> Option<&str> {
        match self {
            Self::Folder => None,
            Self::File { file_name } => Some(file_name),
        }
    }
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self::materialize(DEFAULT_PLACEHOLDER_NAME)
    }
}

impl fmt::Display for PlaceholderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => f.write_str("folder"),
            Self::File { file_name } => write!(f, "file ({file_name})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_parses_known_names_case_insensitively() {
        assert_eq!("content".parse::<EntryKind>().unwrap(), EntryKind::Content);
        assert_eq!(
            "TYPESCRIPTCOMPILE".parse::<EntryKind>().unwrap(),
            EntryKind::TypeScriptCompile
        );
        assert_eq!("Folder".parse::<EntryKind>().unwrap(), EntryKind::Folder);
    }

    #[test]
    fn entry_kind_keeps_custom_element_names() {
        let kind: EntryKind = "ApplicationDefinition".parse().unwrap();
        assert_eq!(kind, EntryKind::Custom("ApplicationDefinition".into()));
        assert_eq!(kind.to_string(), "ApplicationDefinition");
    }

    #[test]
    fn entry_kind_rejects_blank_names() {
        assert!("".parse::<EntryKind>().is_err());
        assert!("Two Words".parse::<EntryKind>().is_err());
    }

    #[test]
    fn default_placeholder_policy_materializes_readme() {
        let policy = PlaceholderPolicy::default();
        assert_eq!(policy.placeholder_name(), Some("readme.txt"));
        assert_eq!(PlaceholderPolicy::Folder.placeholder_name(), None);
    }
}

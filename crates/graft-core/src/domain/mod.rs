//! Core domain layer for Graft.
//!
//! This module contains pure logic with no I/O: logical path
//! normalization, entry classification, the manifest index and the
//! directory bookkeeping the merge relies on. Filesystem and manifest
//! document access happen through ports defined in the application layer.
//!
//! ## Invariants
//!
//! - **Case-insensitive keys**: every lookup goes through `LogicalPath::key`
//! - **Immutable configuration**: `TypeMapping` is built once and shared
//! - **Append-only manifests**: nothing here removes or rewrites entries

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    DirectoryFileMap, LogicalPath, ManifestEntry, ManifestIndex, PathClassifier, TypeMapping,
    filter::{EntryFilter, PathFilter},
    type_mapping::{DEFAULT_SUFFIX, FOLDER_SUFFIX, TypeMappingBuilder},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{DEFAULT_PLACEHOLDER_NAME, EntryKind, PlaceholderPolicy};

pub use validation::DomainValidator;

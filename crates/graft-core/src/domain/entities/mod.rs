pub mod classifier;
pub mod common;
pub mod directory_map;
pub mod filter;
pub mod manifest_entry;
pub mod manifest_index;
pub mod type_mapping;

pub use crate::domain::DomainError;
pub use classifier::PathClassifier;
pub use common::LogicalPath;
pub use directory_map::DirectoryFileMap;
pub use manifest_entry::ManifestEntry;
pub use manifest_index::ManifestIndex;
pub use type_mapping::TypeMapping;

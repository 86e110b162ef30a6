//! Manifest adapters.
//!
//! `XmlManifest` is the production document; `InMemoryManifest` backs
//! tests that only care about entries.

mod memory;
pub mod query;
mod xml;

use std::path::Path;

use graft_core::{
    application::ports::{ManifestDocument, ManifestStore},
    error::GraftResult,
};

pub use memory::InMemoryManifest;
pub use query::{QueryError, QueryPath};
pub use xml::{DEFAULT_INCLUDE_SEPARATOR, XmlManifest};

/// Opens manifests from disk as [`XmlManifest`] documents.
#[derive(Debug, Clone, Copy)]
pub struct XmlManifestStore {
    separator: char,
}

impl XmlManifestStore {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_INCLUDE_SEPARATOR,
        }
    }

    /// Separator written into new `Include` attributes.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

impl Default for XmlManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestStore for XmlManifestStore {
    fn open(&self, path: &Path) -> GraftResult<Box<dyn ManifestDocument>> {
        Ok(Box::new(
            XmlManifest::load(path)?.with_separator(self.separator),
        ))
    }
}

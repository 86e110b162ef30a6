//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `graft-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: walking, copying, placeholder creation
//!   - `ManifestStore`: opening manifest documents
//!   - `ManifestDocument`: reading and appending manifest entries
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

#[cfg(test)]
pub use output::MockFilesystem;
pub use output::{
    EntryType, Filesystem, ManifestDocument, ManifestStore, UnreadableEntry, WalkEntry,
    WalkOutcome,
};

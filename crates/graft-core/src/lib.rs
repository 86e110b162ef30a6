//! Graft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Graft, a tool
//! that merges a payload tree into a project and keeps the project's XML
//! manifest in step with what was copied.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            graft-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (MergeService, ProjectService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ManifestStore, Document)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     graft-adapters (Infrastructure)     │
//! │   (LocalFilesystem, XmlManifest, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (LogicalPath, ManifestIndex, Classifier)│
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use graft_core::prelude::*;
//!
//! # fn run(fs: Box<dyn Filesystem>, manifest: &mut dyn ManifestDocument) -> GraftResult<()> {
//! let service = MergeService::new(fs, PathClassifier::default());
//! let request = MergeRequest::new("./payload", "./MyProject")
//!     .logical_root(LogicalPath::parse("wwwroot")?)
//!     .filter(EntryFilter::all().exclude("*/node_modules/*")?);
//!
//! let report = service.merge(&request, manifest)?;
//! println!("{} entries added", report.new_entry_count());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InitRequest, MergeReport, MergeRequest, MergeService, Project, ProjectService,
        ports::{Filesystem, ManifestDocument, ManifestStore},
    };
    pub use crate::domain::{
        EntryFilter, EntryKind, LogicalPath, ManifestEntry, PathClassifier, PlaceholderPolicy,
        TypeMapping,
    };
    pub use crate::error::{GraftError, GraftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Application layer for Graft.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (MergeService, ProjectService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain types (index, directory map,
//! classifier) against the ports. Path and classification rules themselves
//! live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CopiedFile, DEFAULT_LOCATE_DEPTH, FileFailure, InitRequest, MergeReport, MergeRequest,
    MergeService, MergeState, Project, ProjectService, ReconcileOutcome, SkipReason, SkippedFile,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ManifestDocument, ManifestStore};

pub use error::ApplicationError;

//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "merge a payload into a project" or
//! "create a project from a template".

pub mod merge_service;
pub mod project_service;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use merge_service::{MergeRequest, MergeService, MergeState, ReconcileOutcome};
pub use project_service::{DEFAULT_LOCATE_DEPTH, InitRequest, Project, ProjectService};
pub use report::{CopiedFile, FileFailure, MergeReport, SkipReason, SkippedFile};

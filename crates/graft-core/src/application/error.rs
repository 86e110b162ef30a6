//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! path/manifest rules. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A directory or file the operation depends on does not exist.
    #[error("{what} not found: {path}")]
    NotFound { what: String, path: PathBuf },

    /// The target already holds something that conflicts with the request.
    #[error("Already exists at {path}: {reason}")]
    AlreadyExists { path: PathBuf, reason: String },

    /// Filesystem operation failed (permissions, disk full, ...).
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The manifest document could not be read, parsed or written.
    #[error("Manifest error at {path}: {reason}")]
    ManifestError { path: PathBuf, reason: String },

    /// Shared in-memory state was poisoned by a panicking writer.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    pub fn not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { what, path } => vec![
                format!("Missing {what}: {}", path.display()),
                "Check the path for typos".into(),
                "Relative paths are resolved against the current directory".into(),
            ],
            Self::AlreadyExists { path, .. } => vec![
                format!("Conflicting file: {}", path.display()),
                "Pick an empty target directory".into(),
                "Or pass --name matching the existing manifest to reuse it".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::ManifestError { path, .. } => vec![
                format!("Inspect the manifest: {}", path.display()),
                "The manifest must be a well-formed XML project file".into(),
            ],
            Self::LockPoisoned => vec!["This appears to be a bug in Graft".into()],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
            Self::ManifestError { .. } => ErrorCategory::Structural,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}

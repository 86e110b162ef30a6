//! Unified error handling for Graft Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Graft Core operations.
///
/// Returned only for failures that abort an operation. Problems with a
/// single file during a merge walk are collected in the merge report instead.
#[derive(Debug, Error, Clone)]
pub enum GraftError {
    /// Errors from the domain layer (path and manifest rules).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and I/O).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GraftError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Graft".into(),
                "Please report this issue at: https://github.com/cosecruz/graft/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Structural => ErrorCategory::Structural,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this is the "missing source/manifest/descriptor" kind.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Structural,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GraftResult<T> = Result<T, GraftError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_found_keeps_the_failing_path() {
        let err: GraftError =
            ApplicationError::not_found("source directory", "/missing/payload").into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/missing/payload"));
    }

    #[test]
    fn already_exists_is_a_conflict() {
        let err: GraftError = ApplicationError::AlreadyExists {
            path: PathBuf::from("/t/Other.csproj"),
            reason: "different manifest".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn structural_domain_errors_map_through() {
        let err: GraftError = DomainError::StructuralInconsistency {
            path: "/x".into(),
            reason: "r".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Structural);
    }
}

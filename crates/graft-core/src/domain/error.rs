// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid logical path '{path}': {reason}")]
    InvalidLogicalPath { path: String, reason: String },

    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid type mapping: {0}")]
    InvalidTypeMapping(String),

    #[error("Invalid placeholder file name '{name}': {reason}")]
    InvalidPlaceholderName { name: String, reason: String },

    #[error("Unknown entry kind '{0}'")]
    UnknownEntryKind(String),

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// A path cannot be given a single, unambiguous meaning in the project
    /// (placeholder colliding with a real file, payload root never found).
    #[error("Structural inconsistency at '{path}': {reason}")]
    StructuralInconsistency { path: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidLogicalPath { path, .. } => vec![
                format!("Check the logical path: {path}"),
                "Logical paths are project-relative, e.g. Scripts/app.ts".into(),
                "'..' segments are not allowed".into(),
            ],
            Self::InvalidPattern { pattern, .. } => vec![
                format!("Check the glob pattern: {pattern}"),
                "Examples: *.ts, **/bin/**, *.Designer.cs".into(),
            ],
            Self::InvalidTypeMapping(_) => vec![
                "Check the [types] table in your configuration".into(),
                "Suffixes map to manifest element names, e.g. ts = \"TypeScriptCompile\"".into(),
            ],
            Self::InvalidPlaceholderName { .. } => vec![
                "Placeholder names must be a plain file name without separators".into(),
                "Example: --placeholder-name readme.txt".into(),
            ],
            Self::StructuralInconsistency { path, .. } => vec![
                format!("Inspect the directory: {path}"),
                "An extracted payload must contain files or several folders".into(),
                "Raise locate.max_depth if the payload is deeply nested".into(),
            ],
            Self::UnknownEntryKind(_) => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLogicalPath { .. }
            | Self::InvalidPattern { .. }
            | Self::InvalidPlaceholderName { .. }
            | Self::UnknownEntryKind(_) => ErrorCategory::Validation,
            Self::InvalidTypeMapping(_) => ErrorCategory::Configuration,
            Self::StructuralInconsistency { .. } => ErrorCategory::Structural,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Structural,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_names_the_path() {
        let err = DomainError::StructuralInconsistency {
            path: "/tmp/payload".into(),
            reason: "empty directory".into(),
        };
        assert!(err.to_string().contains("/tmp/payload"));
        assert!(err.suggestions().iter().any(|s| s.contains("/tmp/payload")));
        assert_eq!(err.category(), ErrorCategory::Structural);
    }

    #[test]
    fn type_mapping_is_a_configuration_problem() {
        let err = DomainError::InvalidTypeMapping("missing default".into());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}

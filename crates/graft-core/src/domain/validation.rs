use crate::domain::{
    entities::LogicalPath,
    error::DomainError,
    value_objects::PlaceholderPolicy,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_logical_root(raw: &str) -> Result<LogicalPath, DomainError> {
        LogicalPath::parse(raw)
    }

    pub fn validate_placeholder_policy(policy: &PlaceholderPolicy) -> Result<(), DomainError> {
        let Some(name) = policy.placeholder_name() else {
            return Ok(());
        };
        let reason = if name.trim().is_empty() {
            Some("name cannot be empty")
        } else if name.contains(['/', '\\']) {
            Some("name cannot contain path separators")
        } else if name == "." || name == ".." {
            Some("name cannot be a relative directory reference")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(DomainError::InvalidPlaceholderName {
                name: name.to_string(),
                reason: reason.into(),
            }),
            None => Ok(()),
        }
    }
}

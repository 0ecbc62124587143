//! Error types surfaced by a ranking pass.

use thiserror::Error;

use crate::request::RequirementId;

/// A factor override that could not be turned into a usable number.
///
/// Carries the requirement's id and text so the caller can find the
/// offending entry in its input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("requirement {id} '{requirement}': {field} {reason} (got '{value}')")]
pub struct ValidationError {
    pub id: RequirementId,
    pub requirement: String,
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum RankError {
    /// One or more overrides were malformed. Every offending field is listed,
    /// not just the first one found.
    #[error("{} invalid factor override(s): {}", .0.len(), join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl RankError {
    /// Validation failures, if this error carries any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            RankError::Validation(errors) => errors,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_requirement() {
        let err = ValidationError {
            id: RequirementId(2),
            requirement: "Export to CSV".to_string(),
            field: "importance",
            value: "high".to_string(),
            reason: "must be numeric",
        };
        let msg = err.to_string();
        assert!(msg.contains("#3"));
        assert!(msg.contains("Export to CSV"));
        assert!(msg.contains("importance must be numeric"));
        assert!(msg.contains("'high'"));
    }

    #[test]
    fn test_rank_error_lists_all() {
        let make = |field| ValidationError {
            id: RequirementId(0),
            requirement: "Login".to_string(),
            field,
            value: "x".to_string(),
            reason: "must be numeric",
        };
        let err = RankError::Validation(vec![make("importance"), make("urgency")]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 invalid factor override(s)"));
        assert!(msg.contains("importance"));
        assert!(msg.contains("urgency"));
        assert_eq!(err.validation_errors().len(), 2);
    }
}

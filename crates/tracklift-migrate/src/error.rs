//! Error types for migration operations.

use thiserror::Error;

/// Exit status for a label that exists on neither side of the migration.
pub const EXIT_UNRESOLVABLE_LABEL: u8 = 5;

/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Migration-specific errors.
///
/// None of these are retried. Every variant ends the run.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Failed to authenticate with a service.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested resource not found on a service.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Network error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operator picked a project or repository that was not listed.
    #[error("{0} not found")]
    SelectionNotFound(String),

    /// Source issue numbering has a gap or is out of order.
    #[error(
        "Issues not in order: expected issue {expected}, found {found}. \
         Preservation of skipped issue IDs is not implemented"
    )]
    IssueSequenceMismatch { expected: u64, found: u64 },

    /// An issue references a label missing from the source project.
    #[error("Unable to find label {0} in gitlab")]
    UnresolvableLabel(String),

    /// Strict mode: an issue references a milestone that was never created.
    #[error("Milestone {0} has no destination mapping")]
    UnmappedMilestone(u64),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl MigrationError {
    /// Process exit status the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UnresolvableLabel(_) => EXIT_UNRESOLVABLE_LABEL,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(MigrationError::UnresolvableLabel("bug".into()).exit_code(), 5);
        assert_eq!(
            MigrationError::IssueSequenceMismatch {
                expected: 3,
                found: 4
            }
            .exit_code(),
            1
        );
        assert_eq!(MigrationError::SelectionNotFound("42".into()).exit_code(), 1);
        assert_eq!(MigrationError::ApiError("boom".into()).exit_code(), 1);
    }

    #[test]
    fn test_sequence_mismatch_message() {
        let err = MigrationError::IssueSequenceMismatch {
            expected: 3,
            found: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected issue 3"));
        assert!(msg.contains("found 4"));
    }
}

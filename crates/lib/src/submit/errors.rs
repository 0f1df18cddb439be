//! Error types for submission.

use thiserror::Error;

use super::Violation;

/// Structured error types for submitting an edited object.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The object has validation violations and was not saved
    #[error("Validation failed with {} violation(s)", violations.len())]
    ValidationFailed { violations: Vec<Violation> },

    /// The persistence service failed; the document was restored
    #[error("Persistence failed: {reason}")]
    PersistenceFailed { reason: String },
}

impl SubmitError {
    /// Check if this error carries validation violations
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SubmitError::ValidationFailed { .. })
    }

    /// Check if this error came from the persistence service
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, SubmitError::PersistenceFailed { .. })
    }

    /// The violations of a failed validation, empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            SubmitError::ValidationFailed { violations } => violations,
            SubmitError::PersistenceFailed { .. } => &[],
        }
    }
}

// Conversion from SubmitError to the main Error type
impl From<SubmitError> for crate::Error {
    fn from(err: SubmitError) -> Self {
        crate::Error::Submit(err)
    }
}

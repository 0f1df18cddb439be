//! Error types for type scaffolding.
//!
//! The factory degrades to shells for types it does not know, so the only
//! failure is a type descriptor that is not a descriptor at all.

use thiserror::Error;

/// Structured error types for the scaffolding factory.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// The descriptor is neither an identifier, a generic-type call nor a type
    #[error("Invalid type descriptor {descriptor}: {reason}")]
    InvalidTypeDescriptor { descriptor: String, reason: String },
}

impl FactoryError {
    pub(crate) fn invalid(descriptor: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        FactoryError::InvalidTypeDescriptor {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is caused by a malformed type descriptor
    pub fn is_invalid_descriptor(&self) -> bool {
        matches!(self, FactoryError::InvalidTypeDescriptor { .. })
    }
}

// Conversion from FactoryError to the main Error type
impl From<FactoryError> for crate::Error {
    fn from(err: FactoryError) -> Self {
        crate::Error::Factory(err)
    }
}

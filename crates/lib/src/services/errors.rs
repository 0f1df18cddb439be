//! Error types for the external service seams.
//!
//! Services are opaque request/response collaborators. Their failures are
//! reported with enough structure to tell a missing object from a service that
//! could not be reached or refused the request.

use thiserror::Error;

/// Structured error types for external services.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No object is stored under the id
    #[error("Object not found: {id}")]
    NotFound { id: String },

    /// The service could not be reached or did not answer
    #[error("Service unavailable: {reason}")]
    Unavailable { reason: String },

    /// The service answered but refused the request
    #[error("Request rejected: {reason}")]
    Rejected { reason: String },

    /// Reading or writing the service's backing storage failed
    #[error("Service I/O failed: {reason}")]
    Io { reason: String },
}

impl ServiceError {
    /// Check if this error indicates a missing object
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// Check if the request may succeed when retried later
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable { .. } | ServiceError::Io { .. })
    }

    /// Check if the service refused the request
    pub fn is_rejected(&self) -> bool {
        matches!(self, ServiceError::Rejected { .. })
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Io {
            reason: err.to_string(),
        }
    }
}

// Conversion from ServiceError to the main Error type
impl From<ServiceError> for crate::Error {
    fn from(err: ServiceError) -> Self {
        crate::Error::Service(err)
    }
}

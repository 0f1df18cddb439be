//!
//! zobject: typed function-object documents.
//! This library provides the document model behind a function-object editor:
//! functions, implementations, testers and types stored as a generic,
//! recursively typed expression tree and edited field by field.
//!
//! ## Core Concepts
//!
//! * **Nodes (`model::Node`)**: A document is a tree of terminal texts, tagged composites (`model::ZObject`) and typed lists (`model::ZList`) whose element 0 is the type marker.
//! * **Canonical and normalized forms (`convert`)**: The terse wire form and the fully explicit editing form, converted losslessly in both directions.
//! * **Key paths (`model::Path`)**: Dot separated paths such as `main.Z2K2.Z8K1.1` address every location of a namespaced `model::Document`.
//! * **Factory (`factory::Factory`)**: Scaffolds a default instance of any type descriptor, including generic and recursive types, through an extensible `factory::BuilderRegistry`.
//! * **Store (`store::Store`)**: Owns the document and exposes path-based reads and mutations. Placeholders for types not yet known are patched when the lookup arrives as a `services::FetchEvent`.
//! * **Submission (`submit`)**: Normalizes and validates the edited object, then hands its canonical form to a `services::PersistenceService`, restoring the document if anything fails.
//! * **Context (`config::EditorContext`)**: User language, linked types and the edited object's id, passed explicitly to everything that needs them.

pub mod config;
pub mod constants;
pub mod convert;
pub mod factory;
pub mod model;
pub mod schema;
pub mod services;
pub mod store;
pub mod submit;

/// Re-export the `Store` struct for easier access.
pub use store::Store;

/// Result type used throughout the zobject library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the zobject library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path and shape errors from the model module
    #[error(transparent)]
    Model(model::ModelError),

    /// Structured scaffolding errors from the factory module
    #[error(transparent)]
    Factory(factory::FactoryError),

    /// Structured submission errors from the submit module
    #[error(transparent)]
    Submit(submit::SubmitError),

    /// Structured errors from external services
    #[error(transparent)]
    Service(services::ServiceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Model(_) => "model",
            Error::Factory(_) => "factory",
            Error::Submit(_) => "submit",
            Error::Service(_) => "services",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Model(model_err) => model_err.is_not_found(),
            Error::Service(service_err) => service_err.is_not_found(),
            Error::Io(io_err) => io_err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error was caused by a misused path or list operation.
    pub fn is_edit_error(&self) -> bool {
        matches!(self, Error::Model(_))
    }

    /// Check if this error is a malformed type descriptor.
    pub fn is_invalid_descriptor(&self) -> bool {
        match self {
            Error::Factory(factory_err) => factory_err.is_invalid_descriptor(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Submit(submit_err) => submit_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error came from persisting an object.
    pub fn is_persistence_error(&self) -> bool {
        match self {
            Error::Submit(submit_err) => submit_err.is_persistence_error(),
            _ => false,
        }
    }

    /// Check if this error came from an external service.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Service(service_err) => matches!(service_err, services::ServiceError::Io { .. }),
            _ => false,
        }
    }
}

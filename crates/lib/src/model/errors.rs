//! Error types for document model operations.
//!
//! These errors signal misuse of the path-based API: a path that does not
//! lead anywhere, a list operation aimed at something that is not a list, or
//! an index that would touch the marker item. They indicate a corrupted edit
//! sequence and are returned to the caller immediately.

use thiserror::Error;

/// Structured error types for document model operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An intermediate key of the path does not resolve to a composite or list
    #[error("Path not found: {path} (failed at '{segment}')")]
    PathNotFound { path: String, segment: String },

    /// A list operation targeted something that is not a typed list
    #[error("Not a typed list at {path}: found {actual}")]
    NotAnArray { path: String, actual: &'static str },

    /// A list index is out of range or targets the marker item
    #[error("Invalid index {index} at {path}: list has {len} items")]
    InvalidIndex {
        path: String,
        index: isize,
        len: usize,
    },

    /// A composite operation targeted something that is not a composite
    #[error("Shape mismatch at {path}: expected {expected}, found {actual}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The path itself is malformed (empty, or a bare namespace where a field is needed)
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl ModelError {
    /// Check if this error indicates a path did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::PathNotFound { .. })
    }

    /// Check if this error is related to list operations
    pub fn is_list_error(&self) -> bool {
        matches!(
            self,
            ModelError::NotAnArray { .. } | ModelError::InvalidIndex { .. }
        )
    }

    /// Check if this error is related to node shapes
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            ModelError::ShapeMismatch { .. } | ModelError::NotAnArray { .. }
        )
    }

    /// Get the path this error refers to
    pub fn path(&self) -> &str {
        match self {
            ModelError::PathNotFound { path, .. }
            | ModelError::NotAnArray { path, .. }
            | ModelError::InvalidIndex { path, .. }
            | ModelError::ShapeMismatch { path, .. }
            | ModelError::InvalidPath { path, .. } => path,
        }
    }
}

// Conversion from ModelError to the main Error type
impl From<ModelError> for crate::Error {
    fn from(err: ModelError) -> Self {
        crate::Error::Model(err)
    }
}

//! # Record Store Errors

use thiserror::Error;

use crate::model::RecordId;
use crate::schema::{RecordKind, SchemaError};

/// Result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a storage backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: RecordId },

    #[error("Invalid record id: {0:?}")]
    InvalidId(String),

    #[error("Corrupt document {collection}/{id}: {reason}")]
    Corrupt {
        collection: String,
        id: RecordId,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors returned by [`RecordStore`](super::RecordStore) operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record refused by the schema gate; carries every violation
    #[error(transparent)]
    Validation(#[from] SchemaError),

    #[error("{kind} record not found: {id}")]
    NotFound { kind: RecordKind, id: RecordId },

    /// Partial update was not a JSON object
    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    /// Backend failure, passed through unchanged
    #[error("Backend error: {0}")]
    Backend(#[source] BackendError),

    /// Stored document could not be read as the requested typed record
    #[error("Record codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(err) => err.code().code(),
            StoreError::NotFound { .. } => "SMS_RECORD_NOT_FOUND",
            StoreError::InvalidPatch(_) => "SMS_INVALID_PATCH",
            StoreError::Backend(_) => "SMS_BACKEND_ERROR",
            StoreError::Codec(_) => "SMS_RECORD_CODEC_ERROR",
        }
    }

    /// Returns the schema error when the write was rejected by validation
    pub fn as_validation(&self) -> Option<&SchemaError> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

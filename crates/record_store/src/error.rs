//! Record store error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ValidationFailed;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// One or more draft fields violate a validation rule.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailed),

    /// Another record already uses this email address.
    #[error("email already registered: {email}")]
    DuplicateEmail {
        /// The colliding address, as submitted.
        email: String,
    },

    /// No record with the given id exists.
    #[error("user record not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecordStoreError {
    /// Creates a duplicate email error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, RecordStoreError>;

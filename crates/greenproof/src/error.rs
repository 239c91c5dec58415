//! Error types for the GreenProof service.

use greenproof_core::ValidationError;
use greenproof_store::StoreError;
use thiserror::Error;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum GreenProofError {
    /// Malformed or out-of-range input. Nothing was written.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The referenced action does not exist. Nothing was written.
    #[error("action not found: {0}")]
    NotFound(String),

    /// The storage collaborator failed. Not retried.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, GreenProofError>;

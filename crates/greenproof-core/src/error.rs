//! Error types for GreenProof Core.

use thiserror::Error;

/// Core errors that can occur while parsing identifiers and digests.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {kind}: {value:?}")]
    InvalidHex { kind: &'static str, value: String },
}

/// Validation errors for submitted actions and attestation requests.
///
/// Every variant is detected before anything is written to storage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("quantity must be greater than zero, got {0}")]
    NonPositiveQuantity(f64),

    #[error("quantity must be a finite number")]
    NonFiniteQuantity,

    #[error("unknown impact category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown network: {0:?}")]
    UnknownNetwork(String),
}

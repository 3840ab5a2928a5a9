//! Top-level error type shared across crates.

use thiserror::Error;

/// Parse and validation errors for the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemitError {
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    /// Never carries the offending input.
    #[error("invalid secret seed")]
    InvalidSecretSeed,

    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}

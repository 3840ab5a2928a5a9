use thiserror::Error;

/// Errors raised while encoding or decoding envelope XDR.
///
/// Codec failures are kept as text so the error stays comparable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XdrError {
    #[error("xdr codec: {0}")]
    Codec(String),

    #[error("unsupported {0}")]
    Unsupported(String),

    #[error("length {found} exceeds maximum {max}")]
    LengthExceeded { max: usize, found: usize },

    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

impl From<stellar_xdr::curr::Error> for XdrError {
    fn from(err: stellar_xdr::curr::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Errors raised while building or signing a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("xdr error: {0}")]
    Xdr(#[from] XdrError),

    #[error("transaction has no operations")]
    NoOperations,

    #[error("too many operations: {0} (max 100)")]
    TooManyOperations(usize),

    #[error("memo text is {0} bytes (max 28)")]
    MemoTooLong(usize),

    #[error("transaction timeout or time bounds must be set")]
    TimeoutNotSet,

    #[error("fee overflows u32")]
    FeeOverflow,

    #[error("account sequence number overflow")]
    SequenceOverflow,

    #[error("payment amount must be positive")]
    NonPositiveAmount,

    #[error("transaction not valid before {min_time} (now {now})")]
    TooEarly { min_time: u64, now: u64 },

    #[error("transaction expired at {max_time} (now {now})")]
    Expired { max_time: u64, now: u64 },

    #[error("transaction is not signed by its source account")]
    MissingSourceSignature,
}

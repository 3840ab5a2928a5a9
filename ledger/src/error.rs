use remit_transactions::XdrError;
use remit_types::AccountId;
use thiserror::Error;

use crate::records::ResultCodes;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account {0} not found")]
    NotFound(AccountId),

    #[error("transaction submission failed: {title}{}", codes_suffix(.result_codes))]
    SubmissionFailed {
        status: u16,
        title: String,
        result_codes: Option<ResultCodes>,
    },

    #[error("ledger network unreachable: {0}")]
    Transport(String),

    #[error("invalid response from ledger network: {0}")]
    InvalidResponse(String),

    #[error("failed to encode envelope: {0}")]
    Encoding(#[from] XdrError),
}

fn codes_suffix(codes: &Option<ResultCodes>) -> String {
    match codes {
        Some(codes) => format!(" ({codes})"),
        None => String::new(),
    }
}

impl LedgerError {
    /// The transaction-level result code, when the ledger reported one.
    pub fn transaction_code(&self) -> Option<&str> {
        match self {
            Self::SubmissionFailed {
                result_codes: Some(codes),
                ..
            } => Some(codes.transaction.as_str()),
            _ => None,
        }
    }
}

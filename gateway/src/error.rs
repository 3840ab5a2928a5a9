//! Gateway error types.
//!
//! Every failure is reported as HTTP 500 with a `{"error": message}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use remit_ledger::LedgerError;
use remit_transactions::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid secret key")]
    InvalidSecret,

    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    AccountNotFound(String),

    #[error("invalid transaction envelope: {0}")]
    InvalidEnvelope(String),

    #[error("failed to build transaction: {0}")]
    Build(#[from] TransactionError),

    #[error("{0}")]
    NetworkSubmissionFailure(String),

    #[error("ledger network unavailable: {0}")]
    TransportFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<LedgerError> for GatewayError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(id) => GatewayError::AccountNotFound(format!("account {id} not found")),
            e @ LedgerError::SubmissionFailed { .. } => {
                GatewayError::NetworkSubmissionFailure(e.to_string())
            }
            LedgerError::Transport(msg) => GatewayError::TransportFailure(msg),
            LedgerError::InvalidResponse(msg) => GatewayError::TransportFailure(msg),
            LedgerError::Encoding(e) => GatewayError::InvalidEnvelope(e.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

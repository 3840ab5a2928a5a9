//! HTTP client for the ledger network's REST API.

use std::time::Duration;

use remit_transactions::TransactionEnvelope;
use remit_types::AccountId;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::LedgerError;
use crate::network::LedgerNetwork;
use crate::records::{AccountRecord, FeeStats, Problem, SubmitResult};

/// Default timeout for ledger requests. Submission waits for ledger close.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the ledger network.
///
/// - `GET /accounts/{id}` → [`AccountRecord`]
/// - `GET /fee_stats` → base fee
/// - `POST /transactions` (form field `tx`) → [`SubmitResult`]
#[derive(Clone, Debug)]
pub struct AuroraClient {
    base_url: String,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl AuroraClient {
    /// Create a client with default timeout settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Transport(format!("request timed out: {e}"))
    } else if e.is_connect() {
        LedgerError::Transport(format!("connection failed: {e}"))
    } else {
        LedgerError::Transport(e.to_string())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, LedgerError> {
    response
        .json()
        .await
        .map_err(|e| LedgerError::InvalidResponse(format!("failed to parse {what}: {e}")))
}

/// Turn a non-2xx submission response into a [`LedgerError::SubmissionFailed`].
async fn submission_error(response: Response) -> LedgerError {
    let status = response.status();
    let problem: Option<Problem> = response.json().await.ok();
    let (title, result_codes) = match problem {
        Some(p) => (p.title, p.extras.and_then(|x| x.result_codes)),
        None => (String::new(), None),
    };
    LedgerError::SubmissionFailed {
        status: status.as_u16(),
        title: if title.is_empty() {
            format!("HTTP status {status}")
        } else {
            title
        },
        result_codes,
    }
}

impl LedgerNetwork for AuroraClient {
    async fn load_account(&self, account: &AccountId) -> Result<AccountRecord, LedgerError> {
        let url = self.url(&format!("/accounts/{account}"));
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(LedgerError::NotFound(account.clone())),
            status if !status.is_success() => Err(LedgerError::InvalidResponse(format!(
                "HTTP status {status} loading account"
            ))),
            _ => parse_json(response, "account record").await,
        }
    }

    async fn fetch_base_fee(&self) -> Result<u32, LedgerError> {
        let response = self
            .http_client
            .get(self.url("/fee_stats"))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(LedgerError::InvalidResponse(format!(
                "HTTP status {} fetching fee stats",
                response.status()
            )));
        }

        let stats: FeeStats = parse_json(response, "fee stats").await?;
        stats
            .last_ledger_base_fee
            .as_deref()
            .and_then(|fee| fee.parse().ok())
            .ok_or_else(|| LedgerError::InvalidResponse("missing last_ledger_base_fee".into()))
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResult, LedgerError> {
        let tx = envelope.to_xdr_base64()?;
        debug!(bytes = tx.len(), "submitting transaction envelope");

        let response = self
            .http_client
            .post(self.url("/transactions"))
            .form(&[("tx", tx.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(submission_error(response).await);
        }
        parse_json(response, "submission result").await
    }
}

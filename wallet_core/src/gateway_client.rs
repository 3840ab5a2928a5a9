//! HTTP client for the payment gateway.

use std::future::Future;
use std::time::Duration;

use remit_types::{AccountId, SecretSeed};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WalletError;

/// A gateway reply carrying a message and the ledger's submission result.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentReply {
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct XdrReply {
    xdr: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentXdrBody<'a> {
    sender_public_key: &'a str,
    receiver_public_key: &'a str,
    amount: &'a str,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    #[serde(rename = "signedXDR")]
    signed_xdr: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MakePaymentBody<'a> {
    sender_secret: &'a str,
    receiver_public_key: &'a str,
    amount: &'a str,
}

/// The gateway endpoints the payment form calls.
pub trait PaymentGateway: Send + Sync {
    /// `POST /create-payment-xdr`: an unsigned envelope as base64 XDR.
    fn create_payment_xdr(
        &self,
        sender: &AccountId,
        receiver: &str,
        amount: &str,
    ) -> impl Future<Output = Result<String, WalletError>> + Send;

    /// `POST /submit-signed-transaction`.
    fn submit_signed_transaction(
        &self,
        signed_xdr: &str,
    ) -> impl Future<Output = Result<PaymentReply, WalletError>> + Send;

    /// `POST /make-payment`: the gateway signs with the sender's secret.
    fn make_payment(
        &self,
        sender_secret: &SecretSeed,
        receiver: &str,
        amount: &str,
    ) -> impl Future<Output = Result<PaymentReply, WalletError>> + Send;
}

/// Talks to a running gateway over HTTP.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: String,
}

impl GatewayClient {
    /// Create a client targeting the given base URL (e.g. `http://localhost:3001`).
    pub fn new(gateway_url: impl Into<String>) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WalletError::GatewayUnreachable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, WalletError> {
        let url = format!("{}{}", self.gateway_url, path);
        debug!(%url, "gateway request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| WalletError::GatewayUnreachable(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| WalletError::GatewayUnreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorReply>(&bytes) {
                Ok(reply) => WalletError::Gateway(reply.error),
                Err(_) => WalletError::Gateway(format!("gateway returned HTTP {status}")),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| WalletError::Gateway(format!("invalid gateway response: {e}")))
    }
}

impl PaymentGateway for GatewayClient {
    async fn create_payment_xdr(
        &self,
        sender: &AccountId,
        receiver: &str,
        amount: &str,
    ) -> Result<String, WalletError> {
        let body = CreatePaymentXdrBody {
            sender_public_key: sender.as_str(),
            receiver_public_key: receiver,
            amount,
        };
        let reply: XdrReply = self.post("/create-payment-xdr", &body).await?;
        Ok(reply.xdr)
    }

    async fn submit_signed_transaction(&self, signed_xdr: &str) -> Result<PaymentReply, WalletError> {
        self.post("/submit-signed-transaction", &SubmitBody { signed_xdr })
            .await
    }

    async fn make_payment(
        &self,
        sender_secret: &SecretSeed,
        receiver: &str,
        amount: &str,
    ) -> Result<PaymentReply, WalletError> {
        let body = MakePaymentBody {
            sender_secret: sender_secret.expose(),
            receiver_public_key: receiver,
            amount,
        };
        self.post("/make-payment", &body).await
    }
}

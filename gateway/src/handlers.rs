//! Request and response bodies.
//!
//! Field names are camelCase on the wire; the signed envelope field is
//! `signedXDR`.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use remit_ledger::SubmitResult;

/// An amount as sent by the client: either a JSON string or a JSON number.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    /// The amount as decimal text, before validation.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

// ── Create payment XDR ───────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentXdrRequest {
    pub sender_public_key: String,
    pub receiver_public_key: String,
    pub amount: AmountInput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentXdrResponse {
    pub xdr: String,
}

// ── Submit signed transaction ────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct SubmitSignedTransactionRequest {
    #[serde(rename = "signedXDR")]
    pub signed_xdr: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub message: String,
    pub result: SubmitResult,
}

// ── Make payment (server-side signing) ───────────────────────────────────

/// Carries the sender's secret; wiped on drop and never printed.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct MakePaymentRequest {
    pub sender_secret: String,
    #[zeroize(skip)]
    pub receiver_public_key: String,
    #[zeroize(skip)]
    pub amount: AmountInput,
}

impl fmt::Debug for MakePaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MakePaymentRequest")
            .field("sender_secret", &"<redacted>")
            .field("receiver_public_key", &self.receiver_public_key)
            .field("amount", &self.amount)
            .finish()
    }
}

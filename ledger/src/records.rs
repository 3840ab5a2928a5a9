//! Records exchanged with the ledger network's REST API.

use remit_types::{AccountId, Amount};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An account as reported by `GET /accounts/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    /// Current sequence number. The API encodes it as a string.
    #[serde(with = "string_i64")]
    pub sequence: i64,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl AccountRecord {
    /// Balance of the native asset, if the account holds any.
    pub fn native_balance(&self) -> Option<Amount> {
        self.balances
            .iter()
            .find(|b| b.asset_type == Balance::NATIVE)
            .map(|b| b.balance)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: Amount,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

impl Balance {
    pub const NATIVE: &'static str = "native";

    pub fn native(balance: Amount) -> Self {
        Self {
            balance,
            asset_type: Self::NATIVE.to_string(),
            asset_code: None,
            asset_issuer: None,
        }
    }
}

/// The ledger's answer to a successful `POST /transactions`.
///
/// Fields the gateway does not interpret are kept in `extra` so the record
/// can be handed back to callers unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub hash: String,
    #[serde(default)]
    pub ledger: u32,
    #[serde(default = "default_successful")]
    pub successful: bool,
    #[serde(default)]
    pub envelope_xdr: String,
    #[serde(default)]
    pub result_xdr: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_successful() -> bool {
    true
}

/// Result codes from a rejected submission, e.g. `tx_bad_seq` or
/// `tx_failed` with `[op_underfunded]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCodes {
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,
}

impl ResultCodes {
    pub fn transaction(code: impl Into<String>) -> Self {
        Self {
            transaction: code.into(),
            operations: Vec::new(),
        }
    }

    pub fn operation(code: impl Into<String>) -> Self {
        Self {
            transaction: "tx_failed".to_string(),
            operations: vec![code.into()],
        }
    }
}

impl fmt::Display for ResultCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.transaction)?;
        if !self.operations.is_empty() {
            write!(f, ": {}", self.operations.join(", "))?;
        }
        Ok(())
    }
}

/// Problem document returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Problem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProblemExtras {
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
}

/// The part of `GET /fee_stats` the gateway reads.
#[derive(Debug, Deserialize)]
pub(crate) struct FeeStats {
    #[serde(default)]
    pub last_ledger_base_fee: Option<String>,
}

mod string_i64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

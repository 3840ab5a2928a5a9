//! Gateway configuration with TOML file support.

use serde::{Deserialize, Serialize};

use remit_transactions::MAX_MEMO_TEXT;
use remit_types::NetworkId;
use remit_utils::LogFormat;

use crate::GatewayError;

/// Configuration for the payment gateway.
///
/// Can be loaded from a TOML file via [`GatewayConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Which ledger network to use.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Overrides the network's passphrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_passphrase: Option<String>,

    /// Overrides the network's Aurora REST endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aurora_url: Option<String>,

    /// Base fee per operation, in stroops. Used by `/make-payment`, and by
    /// `/create-payment-xdr` when the network reports no fee.
    #[serde(default = "default_base_fee")]
    pub base_fee: u32,

    /// Seconds from build time until a transaction expires.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,

    /// Text memo attached to every payment.
    #[serde(default = "default_memo")]
    pub memo: String,

    /// Mount `/make-payment`, which signs with a caller-supplied secret.
    #[serde(default = "default_true")]
    pub enable_test_signing: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    3001
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_network() -> NetworkId {
    NetworkId::Testnet
}

fn default_base_fee() -> u32 {
    100
}

fn default_tx_timeout_secs() -> u64 {
    180
}

fn default_memo() -> String {
    "Test Transaction".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GatewayError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GatewayError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GatewayError> {
        toml::from_str(s).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GatewayError> {
        toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// The passphrase transactions are signed against.
    pub fn effective_passphrase(&self) -> String {
        self.network_passphrase
            .clone()
            .unwrap_or_else(|| self.network.passphrase().to_string())
    }

    /// The Aurora endpoint to talk to.
    pub fn effective_aurora_url(&self) -> String {
        self.aurora_url
            .clone()
            .unwrap_or_else(|| self.network.default_aurora_url().to_string())
    }

    /// `bind_address:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Reject values the builder would refuse on every request.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.memo.len() > MAX_MEMO_TEXT {
            return Err(GatewayError::Config(format!(
                "memo is {} bytes, at most {MAX_MEMO_TEXT} allowed",
                self.memo.len()
            )));
        }
        if self.base_fee == 0 {
            return Err(GatewayError::Config("base_fee must be positive".into()));
        }
        if self.tx_timeout_secs == 0 {
            return Err(GatewayError::Config("tx_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            network: default_network(),
            network_passphrase: None,
            aurora_url: None,
            base_fee: default_base_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            memo: default_memo(),
            enable_test_signing: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

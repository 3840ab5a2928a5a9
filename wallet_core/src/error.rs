use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("no currency mapped for location {0}")]
    UnknownLocation(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("{0} is not available")]
    ProviderUnavailable(&'static str),

    #[error("wallet provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("no Diam wallet connected")]
    NotConnected,

    #[error("sender secret key is not set")]
    MissingSecret,

    #[error("invalid key: {0}")]
    Key(String),

    #[error("{0}")]
    Gateway(String),

    #[error("gateway request failed: {0}")]
    GatewayUnreachable(String),
}

//! Wallet provider seams.
//!
//! A host (browser bridge, desktop shell, test double) supplies these. The
//! library never reaches for a global provider object.

use std::future::Future;

use remit_types::AccountId;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request rejected by user")]
    Rejected,

    #[error("provider returned no accounts")]
    NoAccounts,

    #[error("{0}")]
    Failed(String),
}

/// The injected Diam wallet: connect, then sign envelopes.
pub trait DiamWallet: Send + Sync {
    /// Connect and return the wallet's public key.
    fn connect(&self) -> impl Future<Output = Result<AccountId, ProviderError>> + Send;

    /// Sign a base64 XDR envelope for the named network and return the
    /// signed envelope, also base64 XDR.
    fn sign(
        &self,
        xdr: &str,
        submit: bool,
        network_name: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// An Ethereum-style provider. Only account discovery is used.
pub trait EthereumProvider: Send + Sync {
    /// Ask the user to authorize account access.
    fn enable(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn accounts(&self) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send;
}

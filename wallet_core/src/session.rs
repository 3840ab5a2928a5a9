//! Wallet connection state machine.
//!
//! ```text
//! Disconnected ──connect_diam──▶ Diam(pk) ──connect_diam──▶ Diam(pk')
//!      │                            │
//!      │                            └─connect_ethereum─▶ (unchanged)
//!      └──connect_ethereum──▶ Ethereum(acct) ──connect_diam──▶ (unchanged)
//! ```
//!
//! There is no disconnect transition. A failed connect leaves the state as it
//! was.

use remit_types::AccountId;
use tracing::{debug, info};

use crate::error::WalletError;
use crate::providers::{DiamWallet, EthereumProvider, ProviderError};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Connection {
    #[default]
    Disconnected,
    Diam(AccountId),
    Ethereum(String),
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// The Diam public key, when connected to the Diam wallet.
    pub fn diam_public_key(&self) -> Option<&AccountId> {
        match self {
            Self::Diam(pk) => Some(pk),
            _ => None,
        }
    }
}

/// Which providers were present when the session was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Availability {
    pub diam_wallet: bool,
    pub ethereum: bool,
}

/// Result of a successful connect call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Moved from `Disconnected` to the requested provider.
    Connected,
    /// Already on this provider; the account was re-read.
    Refreshed,
    /// Connected to the other provider; nothing changed.
    Skipped,
}

/// Holds the providers detected at startup and the current connection.
pub struct WalletSession<D, E> {
    diam: Option<D>,
    ethereum: Option<E>,
    connection: Connection,
}

impl<D: DiamWallet, E: EthereumProvider> WalletSession<D, E> {
    pub fn new(diam: Option<D>, ethereum: Option<E>) -> Self {
        Self {
            diam,
            ethereum,
            connection: Connection::Disconnected,
        }
    }

    pub fn availability(&self) -> Availability {
        Availability {
            diam_wallet: self.diam.is_some(),
            ethereum: self.ethereum.is_some(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn diam(&self) -> Option<&D> {
        self.diam.as_ref()
    }

    pub async fn connect_diam(&mut self) -> Result<ConnectOutcome, WalletError> {
        if matches!(self.connection, Connection::Ethereum(_)) {
            debug!("already connected to an Ethereum provider; ignoring Diam connect");
            return Ok(ConnectOutcome::Skipped);
        }
        let wallet = self
            .diam
            .as_ref()
            .ok_or(WalletError::ProviderUnavailable("Diam wallet"))?;

        let public_key = wallet.connect().await?;
        let outcome = match self.connection {
            Connection::Diam(_) => ConnectOutcome::Refreshed,
            _ => ConnectOutcome::Connected,
        };
        info!(account = %public_key.short(), "connected to Diam wallet");
        self.connection = Connection::Diam(public_key);
        Ok(outcome)
    }

    pub async fn connect_ethereum(&mut self) -> Result<ConnectOutcome, WalletError> {
        if matches!(self.connection, Connection::Diam(_)) {
            debug!("already connected to the Diam wallet; ignoring Ethereum connect");
            return Ok(ConnectOutcome::Skipped);
        }
        let provider = self
            .ethereum
            .as_ref()
            .ok_or(WalletError::ProviderUnavailable("Ethereum provider"))?;

        provider.enable().await?;
        let account = provider
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::NoAccounts)?;

        let outcome = match self.connection {
            Connection::Ethereum(_) => ConnectOutcome::Refreshed,
            _ => ConnectOutcome::Connected,
        };
        info!(%account, "connected to Ethereum provider");
        self.connection = Connection::Ethereum(account);
        Ok(outcome)
    }
}

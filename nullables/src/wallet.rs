//! Wallet providers that sign with a fixed key and answer with fixed accounts.

use std::sync::{Arc, Mutex};

use remit_crypto::{encode_account_id, keypair_from_seed};
use remit_transactions::TransactionEnvelope;
use remit_types::{AccountId, KeyPair, NetworkId};
use remit_wallet_core::{DiamWallet, EthereumProvider, ProviderError};

/// A sign request the wallet received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignRequest {
    pub xdr: String,
    pub submit: bool,
    pub network_name: String,
}

/// A Diam wallet holding one deterministic key.
///
/// Signs envelopes for real, so a gateway or [`crate::NullLedger`] verifies
/// them. Can be configured to fail connecting or to reject signing.
#[derive(Clone)]
pub struct NullDiamWallet {
    keypair: Arc<KeyPair>,
    fail_connect: bool,
    reject_signing: bool,
    sign_requests: Arc<Mutex<Vec<SignRequest>>>,
}

impl NullDiamWallet {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            keypair: Arc::new(keypair_from_seed(&seed)),
            fail_connect: false,
            reject_signing: false,
            sign_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// `connect` fails as if the user closed the wallet popup.
    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// `sign` fails as if the user declined.
    pub fn rejecting_signatures(mut self) -> Self {
        self.reject_signing = true;
        self
    }

    pub fn account_id(&self) -> AccountId {
        encode_account_id(&self.keypair.public)
    }

    pub fn sign_requests(&self) -> Vec<SignRequest> {
        self.sign_requests.lock().unwrap().clone()
    }
}

impl DiamWallet for NullDiamWallet {
    async fn connect(&self) -> Result<AccountId, ProviderError> {
        if self.fail_connect {
            return Err(ProviderError::Failed("wallet closed".into()));
        }
        Ok(self.account_id())
    }

    async fn sign(&self, xdr: &str, submit: bool, network_name: &str) -> Result<String, ProviderError> {
        self.sign_requests.lock().unwrap().push(SignRequest {
            xdr: xdr.to_string(),
            submit,
            network_name: network_name.to_string(),
        });
        if self.reject_signing {
            return Err(ProviderError::Rejected);
        }
        let network = NetworkId::from_wallet_name(network_name)
            .ok_or_else(|| ProviderError::Failed(format!("unknown network {network_name}")))?;
        let mut envelope = TransactionEnvelope::from_xdr_base64(xdr)
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        envelope
            .sign(&self.keypair, network.passphrase())
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        envelope
            .to_xdr_base64()
            .map_err(|e| ProviderError::Failed(e.to_string()))
    }
}

/// An Ethereum provider with a fixed account list.
#[derive(Clone, Debug, Default)]
pub struct NullEthereumProvider {
    accounts: Vec<String>,
    fail_enable: bool,
}

impl NullEthereumProvider {
    pub fn new(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            fail_enable: false,
        }
    }

    /// `enable` fails as if the user declined access.
    pub fn failing_enable(mut self) -> Self {
        self.fail_enable = true;
        self
    }
}

impl EthereumProvider for NullEthereumProvider {
    async fn enable(&self) -> Result<(), ProviderError> {
        if self.fail_enable {
            return Err(ProviderError::Rejected);
        }
        Ok(())
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.accounts.clone())
    }
}

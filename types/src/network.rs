//! Network identifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RemitError;

/// Identifies which ledger network the gateway talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    Mainnet,
    /// The public test network.
    Testnet,
    /// A local standalone ledger.
    Standalone,
}

impl NetworkId {
    /// Passphrase hashed into every transaction signature payload.
    pub fn passphrase(&self) -> &'static str {
        match self {
            Self::Mainnet => "Diamante MainNet; SEP 2022",
            Self::Testnet => "Diamante Testnet 2024",
            Self::Standalone => "Standalone Network ; February 2017",
        }
    }

    /// Default Aurora REST endpoint for this network.
    pub fn default_aurora_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://mainnet.diamcircle.io",
            Self::Testnet => "https://diamtestnet.diamcircle.io",
            Self::Standalone => "http://localhost:8000",
        }
    }

    /// Network name the browser wallet expects in `sign(xdr, flag, name)`.
    pub fn wallet_name(&self) -> &'static str {
        match self {
            Self::Mainnet => "Diamante Mainnet",
            Self::Testnet => "Diamante Testnet",
            Self::Standalone => "Standalone",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Standalone => "standalone",
        }
    }

    /// Resolve a wallet network name back to the network.
    pub fn from_wallet_name(name: &str) -> Option<Self> {
        [Self::Mainnet, Self::Testnet, Self::Standalone]
            .into_iter()
            .find(|n| n.wallet_name().eq_ignore_ascii_case(name))
    }
}

impl FromStr for NetworkId {
    type Err = RemitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "live" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "standalone" | "local" => Ok(Self::Standalone),
            other => Err(RemitError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("TEST".parse::<NetworkId>().unwrap(), NetworkId::Testnet);
        assert_eq!("local".parse::<NetworkId>().unwrap(), NetworkId::Standalone);
        assert!("moon".parse::<NetworkId>().is_err());
    }

    #[test]
    fn wallet_name_round_trips() {
        for n in [NetworkId::Mainnet, NetworkId::Testnet, NetworkId::Standalone] {
            assert_eq!(NetworkId::from_wallet_name(n.wallet_name()), Some(n));
        }
        assert_eq!(NetworkId::from_wallet_name("diamante testnet"), Some(NetworkId::Testnet));
    }
}

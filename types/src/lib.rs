//! Fundamental types for the Remit payment gateway.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, secret seeds, key material, amounts, timestamps, network
//! identifiers and the common parse error.

pub mod account;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod time;

pub use account::{AccountId, SecretSeed};
pub use amount::Amount;
pub use error::RemitError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use time::{Clock, SystemClock, Timestamp};

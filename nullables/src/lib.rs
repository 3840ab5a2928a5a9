//! Nullable infrastructure for deterministic testing.
//!
//! Everything the gateway and the wallet reach outside the process for (the
//! clock, the ledger network, the browser wallet providers) sits behind a
//! trait. This crate provides implementations of those traits that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what they were asked to do
//! - Never touch the network

pub mod clock;
pub mod ledger;
pub mod wallet;

pub use clock::NullClock;
pub use ledger::{test_account, LedgerRequest, NullLedger};
pub use wallet::{NullDiamWallet, NullEthereumProvider, SignRequest};

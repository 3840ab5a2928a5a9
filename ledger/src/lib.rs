//! Ledger network access for the payment gateway.
//!
//! The gateway never talks HTTP to the ledger directly; it goes through the
//! [`LedgerNetwork`] trait so tests can substitute an in-memory ledger.

pub mod aurora;
pub mod error;
pub mod network;
pub mod records;

pub use aurora::AuroraClient;
pub use error::LedgerError;
pub use network::{account_exists, LedgerNetwork};
pub use records::{AccountRecord, Balance, ResultCodes, SubmitResult};

//! Wallet-side payment library for Remit.
//!
//! Provides what a payment screen needs:
//! - Fiat → token conversion with a static rate table
//! - Diam / Ethereum wallet connection state machine
//! - Payment form state (locations, currencies, amounts, messages)
//! - HTTP client for the payment gateway

pub mod conversion;
pub mod error;
pub mod form;
pub mod gateway_client;
pub mod providers;
pub mod session;

pub use conversion::{convert_to_token, LocationMap, RateTable, TOKENS_PER_USD};
pub use error::WalletError;
pub use form::{PaymentForm, DIAM_CONNECT_ERROR};
pub use gateway_client::{GatewayClient, PaymentGateway, PaymentReply};
pub use providers::{DiamWallet, EthereumProvider, ProviderError};
pub use session::{Availability, ConnectOutcome, Connection, WalletSession};

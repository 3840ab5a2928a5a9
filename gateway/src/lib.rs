//! HTTP payment gateway.
//!
//! Builds unsigned payment envelopes for a browser wallet to sign, relays
//! signed envelopes to the ledger network and, for manual testing, signs and
//! submits with a caller-supplied secret.
//!
//! Routes:
//! - `POST /create-payment-xdr` → `{xdr}`
//! - `POST /submit-signed-transaction` → `{message, result}`
//! - `POST /make-payment` → `{message, result}` (only with `enable_test_signing`)
//!
//! Every failure is HTTP 500 with `{"error": message}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod payments;
pub mod server;
pub mod test_signing;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use server::{router, AppState, BoundGateway, GatewayServer};

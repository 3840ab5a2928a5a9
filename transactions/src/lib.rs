//! Ledger transactions: the payment envelope model, the builder and signing.
//!
//! Wire types and the XDR codec come from `stellar_xdr::curr`.
//!
//! Envelope flow:
//! - **Build**: [`TransactionBuilder`] turns a loaded account plus payment
//!   operations into a [`Transaction`]
//! - **Encode**: [`TransactionEnvelope`] is exchanged as base64 XDR
//! - **Sign**: signatures cover the SHA-256 of the `TransactionSignaturePayload`
//! - **Validate**: [`validate_envelope`] runs the stateless checks a ledger
//!   applies before looking at account state

pub mod builder;
pub mod envelope;
pub mod error;
pub mod signing;
pub mod validation;

pub use builder::TransactionBuilder;
pub use envelope::{
    muxed_account, payment_operation, time_bounds, window_contains, Asset, DecoratedSignature,
    Memo, MuxedAccount, MuxedAccountExt, Operation, OperationBody, PaymentOp, Preconditions,
    TimeBounds, Transaction, TransactionEnvelope, MAX_MEMO_TEXT, MAX_OPERATIONS, MAX_SIGNATURES,
};
pub use error::{TransactionError, XdrError};
pub use signing::transaction_hash;
pub use validation::validate_envelope;

//! Payment envelopes over the ledger's XDR schema.
//!
//! The wire types come from `stellar_xdr::curr`. This module adds the pieces a
//! gateway needs on top: conversions from our key types, a signable envelope
//! that only admits `ENVELOPE_TYPE_TX`, and base64 transport.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use remit_crypto::encode_account_id;
use remit_types::{AccountId, Amount, PublicKey};
use stellar_xdr::curr::{self as xdr, Limits, ReadXdr, Uint256, VecM, WriteXdr};

pub use stellar_xdr::curr::{
    Asset, DecoratedSignature, Memo, MuxedAccount, Operation, OperationBody, PaymentOp,
    Preconditions, TimeBounds, Transaction,
};

use crate::error::XdrError;

/// Maximum bytes in a text memo.
pub const MAX_MEMO_TEXT: usize = 28;
/// Maximum operations per transaction.
pub const MAX_OPERATIONS: usize = 100;
/// Maximum signatures per envelope.
pub const MAX_SIGNATURES: usize = 20;

/// Key accessors for transaction sources and payment destinations.
pub trait MuxedAccountExt {
    /// The underlying ed25519 key that must sign for this account.
    fn public_key(&self) -> PublicKey;

    /// The `G...` id of the underlying account.
    fn account_id(&self) -> AccountId {
        encode_account_id(&self.public_key())
    }
}

impl MuxedAccountExt for MuxedAccount {
    fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519(Uint256(key)) => PublicKey(*key),
            Self::MuxedEd25519(muxed) => PublicKey(muxed.ed25519.0),
        }
    }
}

/// A plain (non-multiplexed) account for `key`.
pub fn muxed_account(key: &PublicKey) -> MuxedAccount {
    MuxedAccount::Ed25519(Uint256(key.0))
}

/// A payment from the transaction source.
pub fn payment_operation(destination: MuxedAccount, asset: Asset, amount: Amount) -> Operation {
    Operation {
        source_account: None,
        body: OperationBody::Payment(PaymentOp {
            destination,
            asset,
            amount: amount.stroops(),
        }),
    }
}

/// The validity window carried by either precondition form.
pub fn time_bounds(cond: &Preconditions) -> Option<&TimeBounds> {
    match cond {
        Preconditions::None => None,
        Preconditions::Time(tb) => Some(tb),
        Preconditions::V2(v2) => v2.time_bounds.as_ref(),
    }
}

/// Whether `now` falls inside `tb`. `max_time == 0` means no upper bound.
pub fn window_contains(tb: &TimeBounds, now: u64) -> bool {
    now >= tb.min_time.0 && (tb.max_time.0 == 0 || now <= tb.max_time.0)
}

/// A v1 transaction plus the signatures collected for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    /// Wrap a transaction with no signatures.
    pub fn unsigned(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: Vec::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// The schema-level envelope, ready for the codec.
    pub fn to_ledger_envelope(&self) -> Result<xdr::TransactionEnvelope, XdrError> {
        if self.signatures.len() > MAX_SIGNATURES {
            return Err(XdrError::LengthExceeded {
                max: MAX_SIGNATURES,
                found: self.signatures.len(),
            });
        }
        let signatures: VecM<DecoratedSignature, 20> = self.signatures.clone().try_into()?;
        Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx: self.tx.clone(),
            signatures,
        }))
    }

    pub fn to_xdr(&self) -> Result<Vec<u8>, XdrError> {
        Ok(self.to_ledger_envelope()?.to_xdr(Limits::none())?)
    }

    /// Decode raw XDR. Trailing bytes are rejected.
    pub fn from_xdr(bytes: &[u8]) -> Result<Self, XdrError> {
        xdr::TransactionEnvelope::from_xdr(bytes, Limits::none())?.try_into()
    }

    pub fn to_xdr_base64(&self) -> Result<String, XdrError> {
        Ok(STANDARD.encode(self.to_xdr()?))
    }

    pub fn from_xdr_base64(encoded: &str) -> Result<Self, XdrError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| XdrError::InvalidBase64(e.to_string()))?;
        Self::from_xdr(&bytes)
    }
}

impl TryFrom<xdr::TransactionEnvelope> for TransactionEnvelope {
    type Error = XdrError;

    fn try_from(envelope: xdr::TransactionEnvelope) -> Result<Self, Self::Error> {
        match envelope {
            xdr::TransactionEnvelope::Tx(v1) => Ok(Self {
                tx: v1.tx,
                signatures: v1.signatures.into(),
            }),
            xdr::TransactionEnvelope::TxV0(_) => {
                Err(XdrError::Unsupported("v0 transaction envelope".into()))
            }
            xdr::TransactionEnvelope::TxFeeBump(_) => {
                Err(XdrError::Unsupported("fee bump transaction envelope".into()))
            }
        }
    }
}

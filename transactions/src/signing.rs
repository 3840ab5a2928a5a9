//! Transaction hashing and envelope signatures.
//!
//! Signers sign the SHA-256 of the XDR `TransactionSignaturePayload`: the
//! network id (`SHA-256(passphrase)`) followed by the tagged transaction. A
//! signature made for one network never verifies on another.

use remit_crypto::{network_id, sha256, sign_message, verify_signature};
use remit_types::{KeyPair, PublicKey, Signature, TxHash};
use stellar_xdr::curr::{
    self as xdr, BytesM, Hash, Limits, SignatureHint, TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction, WriteXdr,
};

use crate::envelope::{
    DecoratedSignature, MuxedAccountExt, Transaction, TransactionEnvelope, MAX_SIGNATURES,
};
use crate::error::{TransactionError, XdrError};

/// Hash a transaction for the network identified by `passphrase`.
pub fn transaction_hash(tx: &Transaction, passphrase: &str) -> Result<TxHash, XdrError> {
    let payload = TransactionSignaturePayload {
        network_id: Hash(network_id(passphrase)),
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    Ok(TxHash::new(sha256(&payload.to_xdr(Limits::none())?)))
}

impl TransactionEnvelope {
    /// The transaction hash, which is also what every signer signs.
    pub fn hash(&self, passphrase: &str) -> Result<TxHash, XdrError> {
        transaction_hash(&self.tx, passphrase)
    }

    /// Append a signature by `keypair`.
    pub fn sign(&mut self, keypair: &KeyPair, passphrase: &str) -> Result<(), TransactionError> {
        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(XdrError::LengthExceeded {
                max: MAX_SIGNATURES,
                found: self.signatures.len() + 1,
            }
            .into());
        }
        let hash = self.hash(passphrase)?;
        let signature = sign_message(hash.as_bytes(), &keypair.private);
        let bytes: BytesM<64> = signature
            .as_bytes()
            .to_vec()
            .try_into()
            .map_err(XdrError::from)?;
        self.signatures.push(DecoratedSignature {
            hint: SignatureHint(keypair.public.hint()),
            signature: xdr::Signature(bytes),
        });
        Ok(())
    }

    /// Whether any attached signature verifies against `key`.
    pub fn is_signed_by(&self, key: &PublicKey, passphrase: &str) -> bool {
        let Ok(hash) = self.hash(passphrase) else {
            return false;
        };
        let hint = key.hint();
        self.signatures
            .iter()
            .filter(|sig| sig.hint.0 == hint)
            .filter_map(|sig| <[u8; 64]>::try_from(sig.signature.0.as_slice()).ok())
            .any(|bytes| verify_signature(hash.as_bytes(), &Signature(bytes), key))
    }

    /// Whether the transaction source account has signed.
    pub fn is_signed_by_source(&self, passphrase: &str) -> bool {
        self.is_signed_by(&self.tx.source_account.public_key(), passphrase)
    }
}

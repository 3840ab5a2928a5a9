//! StrKey encoding of ed25519 public keys (`G...`) and secret seeds (`S...`).
//!
//! Encoding and checksum verification are done by `stellar-strkey`; this module
//! maps them onto the typed `AccountId`/`SecretSeed` wrappers and wipes the
//! intermediate seed copies.

use remit_types::{AccountId, PrivateKey, PublicKey, SecretSeed};
use stellar_strkey::ed25519;
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrKeyError {
    #[error("invalid strkey: {0}")]
    Invalid(#[from] stellar_strkey::DecodeError),
}

/// Encode a public key as a `G...` account id.
pub fn encode_account_id(public_key: &PublicKey) -> AccountId {
    AccountId::new(ed25519::PublicKey(public_key.0).to_string())
        .expect("encoded account id always has StrKey shape")
}

/// Decode and checksum-verify an account id.
pub fn decode_account_id(account: &AccountId) -> Result<PublicKey, StrKeyError> {
    let key = ed25519::PublicKey::from_string(account.as_str())?;
    Ok(PublicKey(key.0))
}

/// Encode a private key as an `S...` secret seed.
pub fn encode_secret_seed(private_key: &PrivateKey) -> SecretSeed {
    let mut key = ed25519::PrivateKey(private_key.0);
    let encoded = key.to_string();
    key.0.zeroize();
    SecretSeed::new(encoded).expect("encoded seed always has StrKey shape")
}

/// Decode and checksum-verify a secret seed.
pub fn decode_secret_seed(seed: &SecretSeed) -> Result<PrivateKey, StrKeyError> {
    let mut key = ed25519::PrivateKey::from_string(seed.expose())?;
    let private = PrivateKey(key.0);
    key.0.zeroize();
    Ok(private)
}

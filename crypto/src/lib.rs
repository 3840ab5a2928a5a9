//! Cryptographic primitives for Remit.
//!
//! - **Ed25519** for signing and signature verification (the ledger's only key type)
//! - **SHA-256** for network ids and transaction hashes
//! - **StrKey** encoding of public keys (`G...`) and secret seeds (`S...`) via
//!   `stellar-strkey`

pub mod hash;
pub mod keys;
pub mod sign;
pub mod strkey;

pub use hash::{network_id, sha256};
pub use keys::{generate_keypair, keypair_from_secret, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use strkey::{
    decode_account_id, decode_secret_seed, encode_account_id, encode_secret_seed, StrKeyError,
};

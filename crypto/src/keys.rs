//! Ed25519 key generation.

use remit_types::{KeyPair, PrivateKey, PublicKey, SecretSeed};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use crate::strkey::{decode_secret_seed, StrKeyError};

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    KeyPair {
        public: PublicKey(verifying_key.to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Derive a key pair from a raw 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Rebuild the key pair behind an `S...` secret seed.
pub fn keypair_from_secret(secret: &SecretSeed) -> Result<KeyPair, StrKeyError> {
    let private = decode_secret_seed(secret)?;
    let public = public_from_private(&private);
    Ok(KeyPair { public, private })
}

//! Ed25519 signing and verification.

use remit_types::{PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

/// Sign a message with a private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `false` for malformed public keys instead of erroring.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn sign_and_verify() {
        let kp = generate_keypair();
        let payload = [0x5Au8; 32];
        let sig = sign_message(&payload, &kp.private);
        assert!(verify_signature(&payload, &sig, &kp.public));
    }

    #[test]
    fn other_key_rejected() {
        let signer = keypair_from_seed(&[1u8; 32]);
        let other = keypair_from_seed(&[2u8; 32]);
        let sig = sign_message(b"tx hash", &signer.private);
        assert!(!verify_signature(b"tx hash", &sig, &other.public));
    }

    #[test]
    fn tampered_payload_rejected() {
        let kp = generate_keypair();
        let sig = sign_message(b"pay 10", &kp.private);
        assert!(!verify_signature(b"pay 11", &sig, &kp.public));
    }

    #[test]
    fn signatures_are_deterministic() {
        let kp = keypair_from_seed(&[99u8; 32]);
        assert_eq!(sign_message(b"x", &kp.private), sign_message(b"x", &kp.private));
    }
}

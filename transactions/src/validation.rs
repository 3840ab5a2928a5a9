//! Envelope validation logic.

use remit_types::Timestamp;

use crate::envelope::{time_bounds, OperationBody, TransactionEnvelope};
use crate::error::TransactionError;

/// Validate an envelope's basic structure (time bounds, source signature, amounts).
///
/// This performs stateless validation only. Stateful checks (sequence number,
/// destination existence, balance) are done by the ledger network.
pub fn validate_envelope(
    envelope: &TransactionEnvelope,
    passphrase: &str,
    now: Timestamp,
) -> Result<(), TransactionError> {
    let tx = &envelope.tx;

    if tx.operations.is_empty() {
        return Err(TransactionError::NoOperations);
    }

    if let Some(tb) = time_bounds(&tx.cond) {
        let now_secs = now.as_secs();
        let (min_time, max_time) = (tb.min_time.0, tb.max_time.0);
        if now_secs < min_time {
            return Err(TransactionError::TooEarly {
                min_time,
                now: now_secs,
            });
        }
        if max_time != 0 && now_secs > max_time {
            return Err(TransactionError::Expired {
                max_time,
                now: now_secs,
            });
        }
    }

    for op in tx.operations.iter() {
        if let OperationBody::Payment(payment) = &op.body {
            if payment.amount <= 0 {
                return Err(TransactionError::NonPositiveAmount);
            }
        }
    }

    if !envelope.is_signed_by_source(passphrase) {
        return Err(TransactionError::MissingSourceSignature);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransactionBuilder;
    use remit_crypto::keypair_from_seed;
    use remit_types::{Amount, KeyPair};

    const PASSPHRASE: &str = "Diamante Testnet 2024";

    fn signed(kp: &KeyPair, now: u64) -> TransactionEnvelope {
        let tx = TransactionBuilder::new(kp.public, 1, 100)
            .add_payment(keypair_from_seed(&[9u8; 32]).public, Amount::parse("1").unwrap())
            .set_timeout(180, Timestamp::new(now))
            .build()
            .unwrap();
        let mut env = TransactionEnvelope::unsigned(tx);
        env.sign(kp, PASSPHRASE).unwrap();
        env
    }

    #[test]
    fn test_valid_envelope_passes() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let env = signed(&kp, 1_000);
        assert!(validate_envelope(&env, PASSPHRASE, Timestamp::new(1_100)).is_ok());
    }

    #[test]
    fn test_expired_envelope_rejected() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let env = signed(&kp, 1_000);
        assert_eq!(
            validate_envelope(&env, PASSPHRASE, Timestamp::new(1_181)),
            Err(TransactionError::Expired {
                max_time: 1_180,
                now: 1_181
            })
        );
    }

    #[test]
    fn test_unsigned_envelope_rejected() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let mut env = signed(&kp, 1_000);
        env.signatures.clear();
        assert_eq!(
            validate_envelope(&env, PASSPHRASE, Timestamp::new(1_000)),
            Err(TransactionError::MissingSourceSignature)
        );
    }

    #[test]
    fn test_wrong_network_rejected() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let env = signed(&kp, 1_000);
        assert_eq!(
            validate_envelope(&env, "Diamante MainNet; SEP 2022", Timestamp::new(1_000)),
            Err(TransactionError::MissingSourceSignature)
        );
    }
}

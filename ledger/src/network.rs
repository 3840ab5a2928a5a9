//! The ledger network seam.

use std::future::Future;

use remit_transactions::TransactionEnvelope;
use remit_types::AccountId;

use crate::error::LedgerError;
use crate::records::{AccountRecord, SubmitResult};

/// Operations the gateway needs from the ledger network.
///
/// Implemented by [`crate::AuroraClient`] for the real network and by
/// `remit_nullables::NullLedger` in tests.
pub trait LedgerNetwork: Send + Sync {
    /// Load an account. A missing account is [`LedgerError::NotFound`].
    fn load_account(
        &self,
        account: &AccountId,
    ) -> impl Future<Output = Result<AccountRecord, LedgerError>> + Send;

    /// The base fee per operation, in stroops, from the most recent ledger.
    ///
    /// [`LedgerError::InvalidResponse`] means the network answered without a
    /// usable fee; callers fall back to a configured fee in that case.
    fn fetch_base_fee(&self) -> impl Future<Output = Result<u32, LedgerError>> + Send;

    /// Submit a signed envelope and wait for it to be applied.
    fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> impl Future<Output = Result<SubmitResult, LedgerError>> + Send;
}

/// Whether an account exists, treating only [`LedgerError::NotFound`] as absence.
pub async fn account_exists<L: LedgerNetwork>(
    ledger: &L,
    account: &AccountId,
) -> Result<bool, LedgerError> {
    match ledger.load_account(account).await {
        Ok(_) => Ok(true),
        Err(LedgerError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

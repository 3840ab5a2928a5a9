//! Payment transaction builder.

use remit_types::{Amount, PublicKey, Timestamp};
use stellar_xdr::curr::{SequenceNumber, StringM, TimePoint, TransactionExt, VecM};

use crate::envelope::{
    muxed_account, payment_operation, Asset, Memo, MuxedAccount, Operation, OperationBody,
    Preconditions, TimeBounds, Transaction, MAX_MEMO_TEXT, MAX_OPERATIONS,
};
use crate::error::{TransactionError, XdrError};

/// Builds a [`Transaction`] from a loaded source account.
///
/// `sequence` is the account's current sequence number as reported by the
/// ledger; the built transaction uses `sequence + 1`. The total fee is
/// `base_fee` per operation.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    source: MuxedAccount,
    sequence: i64,
    base_fee: u32,
    memo: Memo,
    memo_text: Option<String>,
    time_bounds: Option<TimeBounds>,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    pub fn new(source: PublicKey, sequence: i64, base_fee: u32) -> Self {
        Self::with_source(muxed_account(&source), sequence, base_fee)
    }

    /// Start from an already multiplexed source account.
    pub fn with_source(source: MuxedAccount, sequence: i64, base_fee: u32) -> Self {
        Self {
            source,
            sequence,
            base_fee,
            memo: Memo::None,
            memo_text: None,
            time_bounds: None,
            operations: Vec::new(),
        }
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Shorthand for a native-asset payment from the source account.
    pub fn add_payment(self, destination: PublicKey, amount: Amount) -> Self {
        self.add_operation(payment_operation(
            muxed_account(&destination),
            Asset::Native,
            amount,
        ))
    }

    pub fn add_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self.memo_text = None;
        self
    }

    /// Text memo, checked against the 28-byte limit at build time.
    pub fn add_text_memo(mut self, text: impl Into<String>) -> Self {
        self.memo_text = Some(text.into());
        self
    }

    /// Valid from the start of time until `now + secs`.
    pub fn set_timeout(mut self, secs: u64, now: Timestamp) -> Self {
        self.time_bounds = Some(TimeBounds {
            min_time: TimePoint(0),
            max_time: TimePoint(now.plus_secs(secs).as_secs()),
        });
        self
    }

    pub fn set_time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = Some(time_bounds);
        self
    }

    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::NoOperations);
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations(self.operations.len()));
        }
        let memo = match self.memo_text {
            Some(text) if text.len() > MAX_MEMO_TEXT => {
                return Err(TransactionError::MemoTooLong(text.len()))
            }
            Some(text) => Memo::Text(StringM::<28>::try_from(text).map_err(XdrError::from)?),
            None => self.memo,
        };
        for op in &self.operations {
            if let OperationBody::Payment(payment) = &op.body {
                if payment.amount <= 0 {
                    return Err(TransactionError::NonPositiveAmount);
                }
            }
        }
        let time_bounds = self.time_bounds.ok_or(TransactionError::TimeoutNotSet)?;

        let fee = u32::try_from(self.operations.len())
            .ok()
            .and_then(|n| self.base_fee.checked_mul(n))
            .ok_or(TransactionError::FeeOverflow)?;
        let seq_num = self
            .sequence
            .checked_add(1)
            .ok_or(TransactionError::SequenceOverflow)?;

        let operations: VecM<Operation, 100> =
            self.operations.try_into().map_err(XdrError::from)?;

        Ok(Transaction {
            source_account: self.source,
            fee,
            seq_num: SequenceNumber(seq_num),
            cond: Preconditions::Time(time_bounds),
            memo,
            operations,
            ext: TransactionExt::V0,
        })
    }
}

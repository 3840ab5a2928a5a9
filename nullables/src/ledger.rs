//! In-memory ledger network with real signature and
//! sequence checks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use remit_crypto::encode_account_id;
use remit_ledger::{AccountRecord, Balance, LedgerError, LedgerNetwork, ResultCodes, SubmitResult};
use remit_transactions::{
    validate_envelope, Asset, MuxedAccountExt, OperationBody, TransactionEnvelope,
    TransactionError,
};
use remit_types::{AccountId, Amount, Clock, NetworkId};

use crate::clock::NullClock;

/// A request the ledger received, recorded for assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerRequest {
    LoadAccount(AccountId),
    FetchBaseFee,
    Submit { hash: String },
}

#[derive(Clone, Debug)]
struct NullAccount {
    sequence: i64,
    balance: Amount,
}

#[derive(Debug)]
struct LedgerState {
    accounts: HashMap<AccountId, NullAccount>,
    base_fee: Option<u32>,
    offline: bool,
    ledger_seq: u32,
    requests: Vec<LedgerRequest>,
}

/// An in-memory ledger network.
///
/// Submissions are checked the way the real network checks them: time
/// bounds, a signature by the source account, `seq == account.sequence + 1`,
/// the minimum fee, destination existence and balance. Rejections carry the
/// same result codes (`tx_bad_auth`, `tx_bad_seq`, `op_underfunded`, ...).
///
/// Clones share state.
#[derive(Clone, Debug)]
pub struct NullLedger {
    passphrase: String,
    clock: NullClock,
    state: Arc<Mutex<LedgerState>>,
}

fn rejected(codes: ResultCodes) -> LedgerError {
    LedgerError::SubmissionFailed {
        status: 400,
        title: "Transaction Failed".to_string(),
        result_codes: Some(codes),
    }
}

fn validation_code(err: &TransactionError) -> ResultCodes {
    match err {
        TransactionError::TooEarly { .. } => ResultCodes::transaction("tx_too_early"),
        TransactionError::Expired { .. } => ResultCodes::transaction("tx_too_late"),
        TransactionError::MissingSourceSignature => ResultCodes::transaction("tx_bad_auth"),
        TransactionError::NoOperations => ResultCodes::transaction("tx_missing_operation"),
        TransactionError::NonPositiveAmount => ResultCodes::operation("op_malformed"),
        _ => ResultCodes::transaction("tx_malformed"),
    }
}

impl NullLedger {
    /// An empty testnet ledger whose clock starts at [`NullClock::default`].
    pub fn new() -> Self {
        Self::with_clock(NetworkId::Testnet.passphrase(), NullClock::default())
    }

    pub fn with_clock(passphrase: impl Into<String>, clock: NullClock) -> Self {
        Self {
            passphrase: passphrase.into(),
            clock,
            state: Arc::new(Mutex::new(LedgerState {
                accounts: HashMap::new(),
                base_fee: Some(100),
                offline: false,
                ledger_seq: 1,
                requests: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap()
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Create (or overwrite) a funded account.
    pub fn fund(&self, account: &AccountId, balance: Amount, sequence: i64) {
        self.state().accounts.insert(
            account.clone(),
            NullAccount { sequence, balance },
        );
    }

    /// Fee reported by `fetch_base_fee`; `None` makes it an invalid response.
    pub fn set_base_fee(&self, fee: Option<u32>) {
        self.state().base_fee = fee;
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn sequence(&self, account: &AccountId) -> Option<i64> {
        self.state().accounts.get(account).map(|a| a.sequence)
    }

    pub fn balance(&self, account: &AccountId) -> Option<Amount> {
        self.state().accounts.get(account).map(|a| a.balance)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<LedgerRequest> {
        self.state().requests.clone()
    }

    /// Number of accepted transactions.
    pub fn applied_count(&self) -> u32 {
        self.state().ledger_seq - 1
    }

    fn check_online(state: &LedgerState) -> Result<(), LedgerError> {
        if state.offline {
            return Err(LedgerError::Transport("connection failed: null ledger offline".into()));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut LedgerState,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResult, LedgerError> {
        let tx = &envelope.tx;
        validate_envelope(envelope, &self.passphrase, self.clock.now())
            .map_err(|e| rejected(validation_code(&e)))?;

        let source_id = tx.source_account.account_id();
        let source = state
            .accounts
            .get(&source_id)
            .cloned()
            .ok_or_else(|| rejected(ResultCodes::transaction("tx_no_source_account")))?;

        if tx.seq_num.0 != source.sequence + 1 {
            return Err(rejected(ResultCodes::transaction("tx_bad_seq")));
        }

        let min_fee = state.base_fee.unwrap_or(100) as u64 * tx.operations.len() as u64;
        if (tx.fee as u64) < min_fee {
            return Err(rejected(ResultCodes::transaction("tx_insufficient_fee")));
        }

        let fee = Amount::from_stroops(tx.fee as i64);
        let Some(after_fee) = source.balance.checked_sub(fee).filter(|b| b.stroops() >= 0) else {
            return Err(rejected(ResultCodes::transaction("tx_insufficient_balance")));
        };

        // Work on a copy so a failing operation leaves balances untouched.
        let mut accounts = state.accounts.clone();
        if let Some(acc) = accounts.get_mut(&source_id) {
            acc.balance = after_fee;
            acc.sequence = tx.seq_num.0;
        }

        let mut op_failure = None;
        for op in tx.operations.iter() {
            let OperationBody::Payment(payment) = &op.body else {
                op_failure = Some("op_not_supported");
                break;
            };
            let amount = Amount::from_stroops(payment.amount);
            let from_id = op
                .source_account
                .as_ref()
                .map(|m| m.account_id())
                .unwrap_or_else(|| source_id.clone());
            let to_id = payment.destination.account_id();

            if payment.asset != Asset::Native {
                op_failure = Some("op_no_trust");
                break;
            }
            if !accounts.contains_key(&to_id) {
                op_failure = Some("op_no_destination");
                break;
            }
            let Some(from_balance) = accounts
                .get(&from_id)
                .and_then(|a| a.balance.checked_sub(amount))
                .filter(|b| b.stroops() >= 0)
            else {
                op_failure = Some("op_underfunded");
                break;
            };
            if let Some(from) = accounts.get_mut(&from_id) {
                from.balance = from_balance;
            }
            if let Some(to) = accounts.get_mut(&to_id) {
                to.balance = to
                    .balance
                    .checked_add(amount)
                    .ok_or_else(|| rejected(ResultCodes::operation("op_line_full")))?;
            }
        }

        if let Some(code) = op_failure {
            // A failed transaction still consumes its sequence number and fee.
            if let Some(acc) = state.accounts.get_mut(&source_id) {
                acc.balance = after_fee;
                acc.sequence = tx.seq_num.0;
            }
            return Err(rejected(ResultCodes::operation(code)));
        }

        state.accounts = accounts;
        let ledger = state.ledger_seq;
        state.ledger_seq += 1;

        let hash = envelope.hash(&self.passphrase)?;
        Ok(SubmitResult {
            hash: hash.to_hex(),
            ledger,
            successful: true,
            envelope_xdr: envelope.to_xdr_base64()?,
            result_xdr: String::new(),
            extra: serde_json::Map::new(),
        })
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerNetwork for NullLedger {
    async fn load_account(&self, account: &AccountId) -> Result<AccountRecord, LedgerError> {
        let mut state = self.state();
        state.requests.push(LedgerRequest::LoadAccount(account.clone()));
        Self::check_online(&state)?;
        let acc = state
            .accounts
            .get(account)
            .ok_or_else(|| LedgerError::NotFound(account.clone()))?;
        Ok(AccountRecord {
            account_id: account.clone(),
            sequence: acc.sequence,
            balances: vec![Balance::native(acc.balance)],
        })
    }

    async fn fetch_base_fee(&self) -> Result<u32, LedgerError> {
        let mut state = self.state();
        state.requests.push(LedgerRequest::FetchBaseFee);
        Self::check_online(&state)?;
        state
            .base_fee
            .ok_or_else(|| LedgerError::InvalidResponse("missing last_ledger_base_fee".into()))
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResult, LedgerError> {
        let hash = envelope.hash(&self.passphrase)?;
        let mut state = self.state();
        state.requests.push(LedgerRequest::Submit {
            hash: hash.to_hex(),
        });
        Self::check_online(&state)?;
        self.apply(&mut state, envelope)
    }
}

/// Account id for a deterministic test key.
pub fn test_account(seed: u8) -> AccountId {
    encode_account_id(&remit_crypto::keypair_from_seed(&[seed; 32]).public)
}

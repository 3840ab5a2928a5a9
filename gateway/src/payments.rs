//! Build-then-sign-client-side payments: `/create-payment-xdr` and
//! `/submit-signed-transaction`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info, warn};

use remit_crypto::decode_account_id;
use remit_ledger::{account_exists, AccountRecord, LedgerError, LedgerNetwork};
use remit_transactions::{Transaction, TransactionBuilder, TransactionEnvelope};
use remit_types::{AccountId, Amount, PublicKey};

use crate::error::GatewayError;
use crate::handlers::{
    CreatePaymentXdrRequest, CreatePaymentXdrResponse, PaymentResponse,
    SubmitSignedTransactionRequest,
};
use crate::server::AppState;

pub const SUBMITTED_MESSAGE: &str = "Transaction successfully submitted";
pub const MISSING_DESTINATION: &str = "The destination account does not exist!";
pub const MISSING_SOURCE: &str = "The source account does not exist!";

/// A validated account id and the key it encodes.
pub(crate) fn parse_account(raw: &str) -> Result<(AccountId, PublicKey), GatewayError> {
    let id = AccountId::new(raw.trim())
        .map_err(|_| GatewayError::InvalidAccountId(raw.to_string()))?;
    let key = decode_account_id(&id)
        .map_err(|e| GatewayError::InvalidAccountId(format!("{raw}: {e}")))?;
    Ok((id, key))
}

pub(crate) fn parse_amount(raw: &str) -> Result<Amount, GatewayError> {
    Amount::parse_positive(raw.trim()).map_err(|e| GatewayError::InvalidAmount(e.to_string()))
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    body.map(|Json(v)| v)
        .map_err(|e| GatewayError::InvalidRequest(e.body_text()))
}

/// Fail with `AccountNotFound` unless the payment's destination exists.
pub(crate) async fn ensure_destination<L: LedgerNetwork>(
    ledger: &L,
    receiver: &AccountId,
) -> Result<(), GatewayError> {
    if account_exists(ledger, receiver).await? {
        Ok(())
    } else {
        warn!(receiver = %receiver.short(), "destination account does not exist");
        Err(GatewayError::AccountNotFound(MISSING_DESTINATION.to_string()))
    }
}

pub(crate) async fn load_source<L: LedgerNetwork>(
    ledger: &L,
    sender: &AccountId,
) -> Result<AccountRecord, GatewayError> {
    match ledger.load_account(sender).await {
        Ok(record) => Ok(record),
        Err(LedgerError::NotFound(_)) => {
            warn!(sender = %sender.short(), "source account does not exist");
            Err(GatewayError::AccountNotFound(MISSING_SOURCE.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// The network's current base fee, or `fallback` when it reports none.
pub(crate) async fn resolve_base_fee<L: LedgerNetwork>(
    ledger: &L,
    fallback: u32,
) -> Result<u32, GatewayError> {
    match ledger.fetch_base_fee().await {
        Ok(fee) => Ok(fee),
        Err(LedgerError::InvalidResponse(reason)) => {
            warn!(%reason, fallback, "no usable base fee from the network");
            Ok(fallback)
        }
        Err(e) => Err(e.into()),
    }
}

/// A single native payment from `source`, valid until `now + tx_timeout_secs`.
pub(crate) fn build_payment<L>(
    state: &AppState<L>,
    source: PublicKey,
    source_sequence: i64,
    base_fee: u32,
    destination: PublicKey,
    amount: Amount,
) -> Result<Transaction, GatewayError> {
    Ok(TransactionBuilder::new(source, source_sequence, base_fee)
        .add_payment(destination, amount)
        .add_text_memo(state.memo.clone())
        .set_timeout(state.tx_timeout_secs, state.clock.now())
        .build()?)
}

/// Build an unsigned payment envelope and return it as base64 XDR.
///
/// The destination is checked before anything is built; nothing is signed.
pub async fn create_payment_xdr<L: LedgerNetwork>(
    state: &AppState<L>,
    request: CreatePaymentXdrRequest,
) -> Result<String, GatewayError> {
    let (sender, sender_key) = parse_account(&request.sender_public_key)?;
    let (receiver, receiver_key) = parse_account(&request.receiver_public_key)?;
    let amount = parse_amount(&request.amount.as_text())?;

    ensure_destination(&state.ledger, &receiver).await?;
    let source = load_source(&state.ledger, &sender).await?;
    let base_fee = resolve_base_fee(&state.ledger, state.base_fee).await?;

    let tx = build_payment(state, sender_key, source.sequence, base_fee, receiver_key, amount)?;
    debug!(
        sender = %sender.short(),
        receiver = %receiver.short(),
        %amount,
        seq = tx.seq_num.0,
        fee = tx.fee,
        "built payment"
    );
    let xdr = TransactionEnvelope::unsigned(tx)
        .to_xdr_base64()
        .map_err(|e| GatewayError::InvalidEnvelope(e.to_string()))?;
    Ok(xdr)
}

/// Decode a signed envelope and hand it to the network.
pub async fn submit_signed_transaction<L: LedgerNetwork>(
    state: &AppState<L>,
    signed_xdr: &str,
) -> Result<PaymentResponse, GatewayError> {
    let envelope = TransactionEnvelope::from_xdr_base64(signed_xdr)
        .map_err(|e| GatewayError::InvalidEnvelope(e.to_string()))?;
    if let Ok(hash) = envelope.hash(&state.passphrase) {
        debug!(%hash, signatures = envelope.signatures.len(), "submitting envelope");
    }

    let result = state.ledger.submit_transaction(&envelope).await?;
    info!(hash = %result.hash, ledger = result.ledger, "transaction submitted");
    Ok(PaymentResponse {
        message: SUBMITTED_MESSAGE.to_string(),
        result,
    })
}

// ── Axum handlers ────────────────────────────────────────────────────────

pub async fn create_payment_xdr_handler<L: LedgerNetwork + 'static>(
    State(state): State<Arc<AppState<L>>>,
    body: Result<Json<CreatePaymentXdrRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentXdrResponse>, GatewayError> {
    let request = json_body(body)?;
    let xdr = create_payment_xdr(&state, request).await.map_err(|e| {
        warn!(error = %e, "create-payment-xdr failed");
        e
    })?;
    Ok(Json(CreatePaymentXdrResponse { xdr }))
}

pub async fn submit_signed_transaction_handler<L: LedgerNetwork + 'static>(
    State(state): State<Arc<AppState<L>>>,
    body: Result<Json<SubmitSignedTransactionRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, GatewayError> {
    let request = json_body(body)?;
    let response = submit_signed_transaction(&state, &request.signed_xdr)
        .await
        .map_err(|e| {
            warn!(error = %e, "submit-signed-transaction failed");
            e
        })?;
    Ok(Json(response))
}

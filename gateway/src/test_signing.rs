//! `/make-payment`: sign on the server with a secret sent by the caller.
//!
//! Only for manual testing against a test network. Mounted when
//! `enable_test_signing` is set. The secret lives in zeroizing types and is
//! never logged.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use remit_crypto::{encode_account_id, keypair_from_secret};
use remit_ledger::LedgerNetwork;
use remit_transactions::TransactionEnvelope;
use remit_types::SecretSeed;

use crate::error::GatewayError;
use crate::handlers::{MakePaymentRequest, PaymentResponse};
use crate::payments::{
    build_payment, ensure_destination, json_body, load_source, parse_account, parse_amount,
};
use crate::server::AppState;

/// Build, sign with the sender's secret and submit in one call.
///
/// Uses the configured static base fee rather than asking the network.
pub async fn make_payment<L: LedgerNetwork>(
    state: &AppState<L>,
    mut request: MakePaymentRequest,
) -> Result<PaymentResponse, GatewayError> {
    let seed = SecretSeed::new(std::mem::take(&mut request.sender_secret))
        .map_err(|_| GatewayError::InvalidSecret)?;
    let keypair = keypair_from_secret(&seed).map_err(|_| GatewayError::InvalidSecret)?;
    drop(seed);

    let (receiver, receiver_key) = parse_account(&request.receiver_public_key)?;
    let amount_text = request.amount.as_text();
    let amount = parse_amount(&amount_text)?;

    ensure_destination(&state.ledger, &receiver).await?;
    let sender = encode_account_id(&keypair.public);
    let source = load_source(&state.ledger, &sender).await?;

    let tx = build_payment(
        state,
        keypair.public,
        source.sequence,
        state.base_fee,
        receiver_key,
        amount,
    )?;
    let mut envelope = TransactionEnvelope::unsigned(tx);
    envelope.sign(&keypair, &state.passphrase)?;

    let result = state.ledger.submit_transaction(&envelope).await?;
    info!(
        sender = %sender.short(),
        receiver = %receiver.short(),
        %amount,
        hash = %result.hash,
        "payment submitted"
    );
    Ok(PaymentResponse {
        message: format!("Payment of {amount_text} DIAM to {receiver} successful!"),
        result,
    })
}

pub async fn make_payment_handler<L: LedgerNetwork + 'static>(
    State(state): State<Arc<AppState<L>>>,
    body: Result<Json<MakePaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, GatewayError> {
    let request = json_body(body)?;
    let response = make_payment(&state, request).await.map_err(|e| {
        warn!(error = %e, "make-payment failed");
        e
    })?;
    Ok(Json(response))
}

//! Gateway routes driven through `tower::ServiceExt::oneshot` against an
//! in-memory ledger.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use remit_crypto::{encode_account_id, encode_secret_seed, keypair_from_seed};
use remit_gateway::{router, AppState, GatewayConfig};
use remit_nullables::{LedgerRequest, NullLedger};
use remit_transactions::{time_bounds, Memo, MuxedAccountExt, OperationBody, TransactionEnvelope};
use remit_types::{AccountId, Amount, KeyPair, NetworkId};

const SENDER_SEED: [u8; 32] = [1; 32];
const RECEIVER_SEED: [u8; 32] = [2; 32];
const SENDER_SEQUENCE: i64 = 41;

fn account(keypair: &KeyPair) -> AccountId {
    encode_account_id(&keypair.public)
}

fn units(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

struct Harness {
    ledger: NullLedger,
    app: Router,
    sender: KeyPair,
    receiver: AccountId,
}

fn harness_with(config: GatewayConfig) -> Harness {
    let ledger = NullLedger::new();
    let sender = keypair_from_seed(&SENDER_SEED);
    let receiver = account(&keypair_from_seed(&RECEIVER_SEED));
    ledger.fund(&account(&sender), units("1000"), SENDER_SEQUENCE);
    ledger.fund(&receiver, units("10"), 7);

    let state = AppState::new(ledger.clone(), &config).with_clock(Arc::new(ledger.clock().clone()));
    let app = router(state, config.enable_test_signing);
    Harness {
        ledger,
        app,
        sender,
        receiver,
    }
}

fn harness() -> Harness {
    harness_with(GatewayConfig::default())
}

async fn post_raw(app: &Router, path: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, path, body.to_string()).await
}

impl Harness {
    fn sender_id(&self) -> AccountId {
        account(&self.sender)
    }

    async fn create_xdr(&self, amount: &str) -> (StatusCode, Value) {
        post(
            &self.app,
            "/create-payment-xdr",
            json!({
                "senderPublicKey": self.sender_id().as_str(),
                "receiverPublicKey": self.receiver.as_str(),
                "amount": amount,
            }),
        )
        .await
    }

    async fn unsigned_envelope(&self, amount: &str) -> TransactionEnvelope {
        let (status, body) = self.create_xdr(amount).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        TransactionEnvelope::from_xdr_base64(body["xdr"].as_str().unwrap()).unwrap()
    }

    async fn submit(&self, envelope: &TransactionEnvelope) -> (StatusCode, Value) {
        post(
            &self.app,
            "/submit-signed-transaction",
            json!({ "signedXDR": envelope.to_xdr_base64().unwrap() }),
        )
        .await
    }
}

fn passphrase() -> &'static str {
    NetworkId::Testnet.passphrase()
}

// ── create-payment-xdr ───────────────────────────────────────────────────

#[tokio::test]
async fn create_payment_xdr_builds_unsigned_payment() {
    let h = harness();
    let env = h.unsigned_envelope("25.5").await;

    assert!(env.signatures.is_empty());
    assert_eq!(env.tx.source_account.account_id(), h.sender_id());
    assert_eq!(env.tx.seq_num.0, SENDER_SEQUENCE + 1);
    assert_eq!(env.tx.fee, 100);
    let Memo::Text(memo) = &env.tx.memo else {
        panic!("expected a text memo, got {:?}", env.tx.memo);
    };
    assert_eq!(memo.to_utf8_string().unwrap(), "Test Transaction");

    let bounds = time_bounds(&env.tx.cond).unwrap();
    assert_eq!(bounds.min_time.0, 0);
    assert_eq!(bounds.max_time.0, 1_700_000_000 + 180);

    assert_eq!(env.tx.operations.len(), 1);
    let OperationBody::Payment(payment) = &env.tx.operations[0].body else {
        panic!("expected a payment");
    };
    assert_eq!(payment.destination.account_id(), h.receiver);
    assert_eq!(payment.amount, units("25.5").stroops());

    assert_eq!(
        h.ledger.requests(),
        vec![
            LedgerRequest::LoadAccount(h.receiver.clone()),
            LedgerRequest::LoadAccount(h.sender_id()),
            LedgerRequest::FetchBaseFee,
        ]
    );
}

#[tokio::test]
async fn create_payment_xdr_accepts_numeric_amount() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/create-payment-xdr",
        json!({
            "senderPublicKey": h.sender_id().as_str(),
            "receiverPublicKey": h.receiver.as_str(),
            "amount": 12.5,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn missing_receiver_fails_before_building() {
    let h = harness();
    let stranger = account(&keypair_from_seed(&[9; 32]));
    let (status, body) = post(
        &h.app,
        "/create-payment-xdr",
        json!({
            "senderPublicKey": h.sender_id().as_str(),
            "receiverPublicKey": stranger.as_str(),
            "amount": "1",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "The destination account does not exist!");
    assert_eq!(h.ledger.requests(), vec![LedgerRequest::LoadAccount(stranger)]);
}

#[tokio::test]
async fn missing_sender_is_reported() {
    let h = harness();
    let stranger = account(&keypair_from_seed(&[9; 32]));
    let (status, body) = post(
        &h.app,
        "/create-payment-xdr",
        json!({
            "senderPublicKey": stranger.as_str(),
            "receiverPublicKey": h.receiver.as_str(),
            "amount": "1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "The source account does not exist!");
}

#[tokio::test]
async fn bad_input_never_reaches_the_ledger() {
    let h = harness();
    for amount in ["0", "-5", "ten", "1.123456789"] {
        let (status, body) = h.create_xdr(amount).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string(), "{amount}: {body}");
    }

    let (status, body) = post(
        &h.app,
        "/create-payment-xdr",
        json!({
            "senderPublicKey": "GNOTAKEY",
            "receiverPublicKey": h.receiver.as_str(),
            "amount": "1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("invalid account id"));

    assert!(h.ledger.requests().is_empty());
}

#[tokio::test]
async fn malformed_json_is_500_with_error() {
    let h = harness();
    let (status, body) = post_raw(&h.app, "/create-payment-xdr", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));

    let (status, body) = post(&h.app, "/submit-signed-transaction", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_fee_stats_falls_back_to_configured_fee() {
    let h = harness_with(GatewayConfig {
        base_fee: 250,
        ..GatewayConfig::default()
    });
    h.ledger.set_base_fee(None);
    let env = h.unsigned_envelope("1").await;
    assert_eq!(env.tx.fee, 250);
}

#[tokio::test]
async fn network_fee_is_used_when_reported() {
    let h = harness();
    h.ledger.set_base_fee(Some(400));
    let env = h.unsigned_envelope("1").await;
    assert_eq!(env.tx.fee, 400);
}

#[tokio::test]
async fn unreachable_ledger_is_a_transport_failure() {
    let h = harness();
    h.ledger.set_offline(true);
    let (status, body) = h.create_xdr("1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("ledger network unavailable"));
}

// ── submit-signed-transaction ────────────────────────────────────────────

#[tokio::test]
async fn signed_envelope_is_submitted() {
    let h = harness();
    let mut env = h.unsigned_envelope("100").await;
    env.sign(&h.sender, passphrase()).unwrap();

    let (status, body) = h.submit(&env).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Transaction successfully submitted");
    assert_eq!(body["result"]["hash"], env.hash(passphrase()).unwrap().to_hex());
    assert_eq!(body["result"]["successful"], true);

    assert_eq!(h.ledger.sequence(&h.sender_id()), Some(SENDER_SEQUENCE + 1));
    assert_eq!(h.ledger.balance(&h.receiver), Some(units("110")));
}

#[tokio::test]
async fn envelope_signed_by_another_key_is_rejected() {
    let h = harness();
    let mut env = h.unsigned_envelope("1").await;
    env.sign(&keypair_from_seed(&[5; 32]), passphrase()).unwrap();

    let (status, body) = h.submit(&env).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("tx_bad_auth"), "{body}");
    assert_eq!(h.ledger.sequence(&h.sender_id()), Some(SENDER_SEQUENCE));
    assert_eq!(h.ledger.applied_count(), 0);
}

#[tokio::test]
async fn unsigned_envelope_is_rejected() {
    let h = harness();
    let env = h.unsigned_envelope("1").await;
    let (status, body) = h.submit(&env).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("tx_bad_auth"));
}

#[tokio::test]
async fn resubmitting_the_same_envelope_fails_on_sequence() {
    let h = harness();
    let mut env = h.unsigned_envelope("1").await;
    env.sign(&h.sender, passphrase()).unwrap();

    let (status, _) = h.submit(&env).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = h.submit(&env).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("tx_bad_seq"), "{body}");
    assert_eq!(h.ledger.applied_count(), 1);
}

#[tokio::test]
async fn expired_envelope_is_rejected() {
    let h = harness();
    let mut env = h.unsigned_envelope("1").await;
    env.sign(&h.sender, passphrase()).unwrap();
    h.ledger.clock().advance(181);

    let (status, body) = h.submit(&env).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("tx_too_late"));
}

#[tokio::test]
async fn garbage_xdr_is_an_invalid_envelope() {
    let h = harness();
    for xdr in ["not base64!", "AAAA"] {
        let (status, body) = post(
            &h.app,
            "/submit-signed-transaction",
            json!({ "signedXDR": xdr }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid transaction envelope"));
    }
    assert!(h.ledger.requests().is_empty());
}

// ── make-payment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn make_payment_signs_and_submits() {
    let h = harness();
    let secret = encode_secret_seed(&h.sender.private);
    let (status, body) = post(
        &h.app,
        "/make-payment",
        json!({
            "senderSecret": secret.expose(),
            "receiverPublicKey": h.receiver.as_str(),
            "amount": "25",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["message"],
        format!("Payment of 25 DIAM to {} successful!", h.receiver)
    );
    assert_eq!(h.ledger.balance(&h.receiver), Some(units("35")));
    assert_eq!(h.ledger.sequence(&h.sender_id()), Some(SENDER_SEQUENCE + 1));
    assert!(!h.ledger.requests().contains(&LedgerRequest::FetchBaseFee));
}

#[tokio::test]
async fn make_payment_to_missing_account() {
    let h = harness();
    let secret = encode_secret_seed(&h.sender.private);
    let stranger = account(&keypair_from_seed(&[9; 32]));
    let (status, body) = post(
        &h.app,
        "/make-payment",
        json!({
            "senderSecret": secret.expose(),
            "receiverPublicKey": stranger.as_str(),
            "amount": "1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "The destination account does not exist!");
    assert_eq!(h.ledger.applied_count(), 0);
}

#[tokio::test]
async fn make_payment_rejects_bad_secret_without_echoing_it() {
    let h = harness();
    let (status, body) = post(
        &h.app,
        "/make-payment",
        json!({
            "senderSecret": "SNOTASECRET",
            "receiverPublicKey": h.receiver.as_str(),
            "amount": "1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "invalid secret key");
    assert!(h.ledger.requests().is_empty());
}

#[tokio::test]
async fn make_payment_is_absent_when_test_signing_disabled() {
    let h = harness_with(GatewayConfig {
        enable_test_signing: false,
        ..GatewayConfig::default()
    });
    let (status, _) = post(&h.app, "/make-payment", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── cross-cutting ────────────────────────────────────────────────────────

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let h = harness();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/create-payment-xdr")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

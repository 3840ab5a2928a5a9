//! Payment form flows with nullable providers and a stub gateway.

use std::sync::{Arc, Mutex};

use remit_nullables::{NullDiamWallet, NullEthereumProvider};
use remit_transactions::{TransactionBuilder, TransactionEnvelope};
use remit_types::{AccountId, Amount, NetworkId, SecretSeed, Timestamp};
use remit_wallet_core::{
    Connection, PaymentForm, PaymentGateway, PaymentReply, RateTable, WalletError,
    DIAM_CONNECT_ERROR, TOKENS_PER_USD,
};
use rust_decimal::Decimal;

const RECEIVER: &str = "GBRPYHIL2CI3FNQ4BXLFMNDLFJUNPU2HY3ZMFSHONUCEOASW7QC7OX2H";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateXdr { sender: String, receiver: String, amount: String },
    Submit { signed_xdr: String },
    MakePayment { receiver: String, amount: String },
}

/// Builds real unsigned envelopes and records every call.
#[derive(Clone, Default)]
struct StubGateway {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_with: Option<String>,
}

impl StubGateway {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), WalletError> {
        match &self.fail_with {
            Some(msg) => Err(WalletError::Gateway(msg.clone())),
            None => Ok(()),
        }
    }
}

impl PaymentGateway for StubGateway {
    async fn create_payment_xdr(
        &self,
        sender: &AccountId,
        receiver: &str,
        amount: &str,
    ) -> Result<String, WalletError> {
        self.calls.lock().unwrap().push(Call::CreateXdr {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: amount.to_string(),
        });
        self.check()?;
        let source = remit_crypto::decode_account_id(sender).unwrap();
        let dest = remit_crypto::decode_account_id(&AccountId::new(receiver).unwrap()).unwrap();
        let tx = TransactionBuilder::new(source, 1, 100)
            .add_payment(dest, Amount::parse(amount).unwrap())
            .add_text_memo("Test Transaction")
            .set_timeout(180, Timestamp::now())
            .build()
            .unwrap();
        Ok(TransactionEnvelope::unsigned(tx).to_xdr_base64().unwrap())
    }

    async fn submit_signed_transaction(&self, signed_xdr: &str) -> Result<PaymentReply, WalletError> {
        self.calls.lock().unwrap().push(Call::Submit {
            signed_xdr: signed_xdr.to_string(),
        });
        self.check()?;
        Ok(PaymentReply {
            message: "Transaction successfully submitted".to_string(),
            result: serde_json::Value::Null,
        })
    }

    async fn make_payment(
        &self,
        _sender_secret: &SecretSeed,
        receiver: &str,
        amount: &str,
    ) -> Result<PaymentReply, WalletError> {
        self.calls.lock().unwrap().push(Call::MakePayment {
            receiver: receiver.to_string(),
            amount: amount.to_string(),
        });
        self.check()?;
        Ok(PaymentReply {
            message: format!("Payment of {amount} DIAM to {receiver} successful!"),
            result: serde_json::Value::Null,
        })
    }
}

type Form = PaymentForm<NullDiamWallet, NullEthereumProvider, StubGateway>;

fn form(gateway: StubGateway) -> Form {
    PaymentForm::new(
        Some(NullDiamWallet::new([7u8; 32])),
        Some(NullEthereumProvider::new(vec!["0xabc".to_string()])),
        gateway,
    )
}

#[test]
fn test_amount_converts_with_sender_currency() {
    let mut form = form(StubGateway::default());
    assert_eq!(form.converted_amount(), Some("0.00"));
    form.set_amount("100").unwrap();
    assert_eq!(form.sender_currency(), "USD");
    assert_eq!(form.converted_amount(), Some("1250.00"));
}

#[test]
fn test_sender_location_updates_currency_and_amount() {
    let mut form = form(StubGateway::default());
    form.set_amount("100").unwrap();

    form.set_sender_location("India").unwrap();
    assert_eq!(form.sender_location(), Some("India"));
    assert_eq!(form.sender_currency(), "INR");
    assert_eq!(form.converted_amount(), Some("15.63"));

    form.set_sender_location("EU").unwrap();
    assert_eq!(form.sender_currency(), "EUR");
    assert_eq!(form.converted_amount(), Some("1136.36"));
}

#[test]
fn test_unmapped_location_leaves_state() {
    let mut form = form(StubGateway::default());
    form.set_amount("100").unwrap();
    form.set_sender_location("India").unwrap();

    assert!(matches!(
        form.set_sender_location("Atlantis"),
        Err(WalletError::UnknownLocation(_))
    ));
    assert_eq!(form.sender_location(), Some("India"));
    assert_eq!(form.sender_currency(), "INR");
    assert_eq!(form.converted_amount(), Some("15.63"));
}

#[test]
fn test_receiver_location_does_not_touch_amount() {
    let mut form = form(StubGateway::default());
    form.set_amount("100").unwrap();
    form.set_receiver_location("India").unwrap();
    assert_eq!(form.receiver_currency(), "INR");
    assert_eq!(form.sender_currency(), "USD");
    assert_eq!(form.converted_amount(), Some("1250.00"));
}

#[test]
fn test_invalid_amount_clears_conversion() {
    let mut form = form(StubGateway::default());
    form.set_amount("12").unwrap();
    assert!(form.set_amount("12abc").is_err());
    assert_eq!(form.amount(), "12abc");
    assert_eq!(form.converted_amount(), None);
}

#[test]
fn test_location_change_reports_unconvertible_amount() {
    let mut form = form(StubGateway::default());
    assert!(form.set_amount("12abc").is_err());

    assert!(matches!(
        form.set_sender_location("India"),
        Err(WalletError::InvalidAmount(_))
    ));
    assert_eq!(form.sender_location(), Some("India"));
    assert_eq!(form.sender_currency(), "INR");
    assert_eq!(form.converted_amount(), None);
}

#[test]
fn test_location_without_rate_reports_unknown_currency() {
    let rates = RateTable::empty(TOKENS_PER_USD).with_rate("USD", Decimal::ONE);
    let mut form = form(StubGateway::default()).with_rates(rates);
    form.set_amount("100").unwrap();

    assert!(matches!(
        form.set_sender_location("EU"),
        Err(WalletError::UnknownCurrency(c)) if c == "EUR"
    ));
    assert_eq!(form.sender_currency(), "EUR");
    assert_eq!(form.converted_amount(), None);
}

#[test]
fn test_rates_without_sender_currency_clear_conversion() {
    let rates = RateTable::empty(TOKENS_PER_USD).with_rate("INR", Decimal::from(80));
    let form = form(StubGateway::default()).with_rates(rates);
    assert_eq!(form.sender_currency(), "USD");
    assert_eq!(form.converted_amount(), None);
}

#[tokio::test]
async fn test_failed_diam_connect_sets_message() {
    let mut form: Form = PaymentForm::new(
        Some(NullDiamWallet::new([7u8; 32]).failing_connect()),
        None,
        StubGateway::default(),
    );
    assert!(form.connect_diam_wallet().await.is_err());
    assert_eq!(form.payment_message(), DIAM_CONNECT_ERROR);
    assert_eq!(form.connection(), &Connection::Disconnected);
}

#[tokio::test]
async fn test_failed_ethereum_connect_is_silent() {
    let mut form: Form = PaymentForm::new(
        None,
        Some(NullEthereumProvider::new(vec![]).failing_enable()),
        StubGateway::default(),
    );
    assert!(form.connect_ethereum().await.is_err());
    assert_eq!(form.payment_message(), "");
}

#[tokio::test]
async fn test_make_payment_signs_and_submits() {
    let gateway = StubGateway::default();
    let wallet = NullDiamWallet::new([7u8; 32]);
    let mut form: Form = PaymentForm::new(Some(wallet.clone()), None, gateway.clone());

    form.connect_diam_wallet().await.unwrap();
    form.set_receiver_public_key(RECEIVER);
    form.set_amount("100").unwrap();

    let reply = form.make_payment().await.unwrap();
    assert_eq!(reply.message, "Transaction successfully submitted");
    assert_eq!(form.payment_message(), "Transaction successfully submitted");

    let calls = gateway.calls();
    assert_eq!(
        calls[0],
        Call::CreateXdr {
            sender: wallet.account_id().to_string(),
            receiver: RECEIVER.to_string(),
            amount: "1250.00".to_string(),
        }
    );
    let Call::Submit { signed_xdr } = &calls[1] else {
        panic!("expected a submit call, got {:?}", calls[1]);
    };
    let env = TransactionEnvelope::from_xdr_base64(signed_xdr).unwrap();
    assert!(env.is_signed_by_source(NetworkId::Testnet.passphrase()));

    let sign = &wallet.sign_requests()[0];
    assert!(sign.submit);
    assert_eq!(sign.network_name, "Diamante Testnet");
}

#[tokio::test]
async fn test_make_payment_requires_diam_connection() {
    let gateway = StubGateway::default();
    let mut form = form(gateway.clone());
    form.connect_ethereum().await.unwrap();
    form.set_amount("1").unwrap();

    assert!(matches!(
        form.make_payment().await,
        Err(WalletError::NotConnected)
    ));
    assert!(gateway.calls().is_empty());
    assert_eq!(form.payment_message(), "no Diam wallet connected");
}

#[tokio::test]
async fn test_gateway_error_becomes_message() {
    let gateway = StubGateway::failing("account GXYZ not found");
    let mut form = form(gateway);
    form.connect_diam_wallet().await.unwrap();
    form.set_receiver_public_key(RECEIVER);
    form.set_amount("1").unwrap();

    assert!(form.make_payment().await.is_err());
    assert_eq!(form.payment_message(), "account GXYZ not found");
}

#[tokio::test]
async fn test_manual_payment_uses_secret() {
    let gateway = StubGateway::default();
    let mut form = form(gateway.clone());
    form.set_receiver_public_key(RECEIVER);
    form.set_amount("8").unwrap();

    assert!(matches!(
        form.make_manual_payment().await,
        Err(WalletError::MissingSecret)
    ));

    let secret = remit_crypto::encode_secret_seed(&remit_crypto::keypair_from_seed(&[7u8; 32]).private);
    form.set_sender_secret(secret.expose()).unwrap();
    let reply = form.make_manual_payment().await.unwrap();
    assert_eq!(
        reply.message,
        format!("Payment of 100.00 DIAM to {RECEIVER} successful!")
    );
    assert_eq!(
        gateway.calls(),
        vec![Call::MakePayment {
            receiver: RECEIVER.to_string(),
            amount: "100.00".to_string(),
        }]
    );
}

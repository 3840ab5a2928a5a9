//! Payment form state.
//!
//! Holds what the payment screen shows and edits: the wallet connection, both
//! locations and their currencies, the receiver key, the amount typed by the
//! sender and its token equivalent, and the last payment message.

use remit_types::{NetworkId, SecretSeed};
use tracing::{info, warn};

use crate::conversion::{LocationMap, RateTable};
use crate::error::WalletError;
use crate::gateway_client::{PaymentGateway, PaymentReply};
use crate::providers::{DiamWallet, EthereumProvider};
use crate::session::{Availability, ConnectOutcome, Connection, WalletSession};

/// Shown when the Diam wallet fails to connect.
pub const DIAM_CONNECT_ERROR: &str = "Error connecting to Diam Wallet.";

const DEFAULT_CURRENCY: &str = "USD";

pub struct PaymentForm<D, E, G> {
    session: WalletSession<D, E>,
    gateway: G,
    rates: RateTable,
    locations: LocationMap,
    network: NetworkId,

    sender_location: Option<String>,
    sender_currency: String,
    receiver_location: Option<String>,
    receiver_currency: String,
    receiver_public_key: String,
    sender_secret: Option<SecretSeed>,
    amount: String,
    /// `None` while `amount` does not convert.
    converted_amount: Option<String>,
    payment_message: String,
}

impl<D, E, G> PaymentForm<D, E, G>
where
    D: DiamWallet,
    E: EthereumProvider,
    G: PaymentGateway,
{
    /// Create a form for the providers present right now.
    pub fn new(diam: Option<D>, ethereum: Option<E>, gateway: G) -> Self {
        Self {
            session: WalletSession::new(diam, ethereum),
            gateway,
            rates: RateTable::default(),
            locations: LocationMap::default(),
            network: NetworkId::Testnet,
            sender_location: None,
            sender_currency: DEFAULT_CURRENCY.to_string(),
            receiver_location: None,
            receiver_currency: DEFAULT_CURRENCY.to_string(),
            receiver_public_key: String::new(),
            sender_secret: None,
            amount: String::new(),
            converted_amount: Some("0.00".to_string()),
            payment_message: String::new(),
        }
    }

    /// Replace the rate table. If the typed amount no longer converts, the
    /// converted amount is cleared and the failure is logged.
    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        if let Err(e) = self.convert() {
            warn!(
                error = %e,
                currency = %self.sender_currency,
                "amount does not convert with new rates"
            );
        }
        self
    }

    pub fn with_locations(mut self, locations: LocationMap) -> Self {
        self.locations = locations;
        self
    }

    /// The network whose wallet name is passed to the Diam wallet when signing.
    pub fn with_network(mut self, network: NetworkId) -> Self {
        self.network = network;
        self
    }

    pub fn availability(&self) -> Availability {
        self.session.availability()
    }

    pub fn connection(&self) -> &Connection {
        self.session.connection()
    }

    pub fn sender_location(&self) -> Option<&str> {
        self.sender_location.as_deref()
    }

    pub fn sender_currency(&self) -> &str {
        &self.sender_currency
    }

    pub fn receiver_location(&self) -> Option<&str> {
        self.receiver_location.as_deref()
    }

    pub fn receiver_currency(&self) -> &str {
        &self.receiver_currency
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn converted_amount(&self) -> Option<&str> {
        self.converted_amount.as_deref()
    }

    pub fn payment_message(&self) -> &str {
        &self.payment_message
    }

    pub async fn connect_diam_wallet(&mut self) -> Result<ConnectOutcome, WalletError> {
        let result = self.session.connect_diam().await;
        if let Err(e) = &result {
            warn!(error = %e, "error connecting to Diam wallet");
            self.payment_message = DIAM_CONNECT_ERROR.to_string();
        }
        result
    }

    pub async fn connect_ethereum(&mut self) -> Result<ConnectOutcome, WalletError> {
        let result = self.session.connect_ethereum().await;
        if let Err(e) = &result {
            warn!(error = %e, "error connecting to Ethereum provider");
        }
        result
    }

    /// Update the typed amount and its token equivalent.
    ///
    /// The amount is kept even when it does not convert, so the field shows
    /// what was typed; the converted amount is cleared in that case.
    pub fn set_amount(&mut self, amount: impl Into<String>) -> Result<(), WalletError> {
        self.amount = amount.into();
        self.convert().map(|_| ())
    }

    /// Switch the sender's location, its currency and the token equivalent.
    ///
    /// An unmapped location is rejected and nothing changes. A mapped location
    /// is always applied; if the amount then fails to convert, the converted
    /// amount is cleared and the conversion error returned.
    pub fn set_sender_location(&mut self, location: &str) -> Result<(), WalletError> {
        let currency = self
            .locations
            .currency_for(location)
            .ok_or_else(|| WalletError::UnknownLocation(location.to_string()))?
            .to_string();
        self.sender_location = Some(location.to_string());
        self.sender_currency = currency;
        self.convert().map(|_| ())
    }

    /// Switch the receiver's location and currency. Display only.
    pub fn set_receiver_location(&mut self, location: &str) -> Result<(), WalletError> {
        let currency = self
            .locations
            .currency_for(location)
            .ok_or_else(|| WalletError::UnknownLocation(location.to_string()))?
            .to_string();
        self.receiver_location = Some(location.to_string());
        self.receiver_currency = currency;
        Ok(())
    }

    pub fn set_receiver_public_key(&mut self, key: impl Into<String>) {
        self.receiver_public_key = key.into().trim().to_string();
    }

    pub fn set_sender_secret(&mut self, secret: &str) -> Result<(), WalletError> {
        let seed = SecretSeed::new(secret.trim()).map_err(|e| WalletError::Key(e.to_string()))?;
        self.sender_secret = Some(seed);
        Ok(())
    }

    fn convert(&mut self) -> Result<&str, WalletError> {
        match self.rates.convert_to_token(&self.amount, &self.sender_currency) {
            Ok(tokens) => Ok(self.converted_amount.insert(tokens).as_str()),
            Err(e) => {
                self.converted_amount = None;
                Err(e)
            }
        }
    }

    fn payable_amount(&self) -> Result<String, WalletError> {
        self.converted_amount
            .clone()
            .ok_or_else(|| WalletError::InvalidAmount(self.amount.clone()))
    }

    /// Build, wallet-sign and submit a payment of the converted amount.
    pub async fn make_payment(&mut self) -> Result<PaymentReply, WalletError> {
        let result = self.wallet_signed_payment().await;
        self.record(result)
    }

    async fn wallet_signed_payment(&self) -> Result<PaymentReply, WalletError> {
        let sender = self
            .session
            .connection()
            .diam_public_key()
            .ok_or(WalletError::NotConnected)?;
        let wallet = self.session.diam().ok_or(WalletError::NotConnected)?;
        let amount = self.payable_amount()?;

        let xdr = self
            .gateway
            .create_payment_xdr(sender, &self.receiver_public_key, &amount)
            .await?;
        let signed = wallet.sign(&xdr, true, self.network.wallet_name()).await?;
        self.gateway.submit_signed_transaction(&signed).await
    }

    /// Ask the gateway to sign with the sender secret and submit.
    pub async fn make_manual_payment(&mut self) -> Result<PaymentReply, WalletError> {
        let result = self.server_signed_payment().await;
        self.record(result)
    }

    async fn server_signed_payment(&self) -> Result<PaymentReply, WalletError> {
        let secret = self.sender_secret.as_ref().ok_or(WalletError::MissingSecret)?;
        let amount = self.payable_amount()?;
        self.gateway
            .make_payment(secret, &self.receiver_public_key, &amount)
            .await
    }

    fn record(
        &mut self,
        result: Result<PaymentReply, WalletError>,
    ) -> Result<PaymentReply, WalletError> {
        match &result {
            Ok(reply) => {
                info!(message = %reply.message, "payment completed");
                self.payment_message = reply.message.clone();
            }
            Err(e) => {
                warn!(error = %e, "error making payment");
                self.payment_message = e.to_string();
            }
        }
        result
    }
}

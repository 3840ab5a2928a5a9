//! Static fiat → token conversion.
//!
//! `tokens = amount / rate[currency] * tokens_per_usd`, rounded to two decimal
//! places (midpoint away from zero) and always rendered with two fraction
//! digits. Rates are units of the currency per one USD.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::WalletError;

/// Tokens credited per one USD.
pub const TOKENS_PER_USD: Decimal = Decimal::from_parts(125, 0, 0, false, 1);

/// Decimal places of a converted amount.
pub const TOKEN_DECIMALS: u32 = 2;

/// Currency rates relative to USD.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
    tokens_per_usd: Decimal,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::empty(TOKENS_PER_USD)
            .with_rate("USD", Decimal::ONE)
            .with_rate("EUR", Decimal::from_parts(11, 0, 0, false, 1))
            .with_rate("INR", Decimal::from(80))
    }
}

impl RateTable {
    pub fn empty(tokens_per_usd: Decimal) -> Self {
        Self {
            rates: BTreeMap::new(),
            tokens_per_usd,
        }
    }

    pub fn with_rate(mut self, currency: &str, rate: Decimal) -> Self {
        self.rates.insert(currency.to_string(), rate);
        self
    }

    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Convert a fiat amount to tokens. An empty amount converts as zero.
    pub fn convert_to_token(&self, amount: &str, currency: &str) -> Result<String, WalletError> {
        let rate = self
            .rate(currency)
            .ok_or_else(|| WalletError::UnknownCurrency(currency.to_string()))?;

        let trimmed = amount.trim();
        let value = if trimmed.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from_str(trimmed).map_err(|_| WalletError::InvalidAmount(amount.to_string()))?
        };

        let mut tokens = value
            .checked_div(rate)
            .and_then(|usd| usd.checked_mul(self.tokens_per_usd))
            .ok_or_else(|| WalletError::InvalidAmount(amount.to_string()))?
            .round_dp_with_strategy(TOKEN_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        tokens.rescale(TOKEN_DECIMALS);
        Ok(tokens.to_string())
    }
}

/// Convert with the default rate table.
pub fn convert_to_token(amount: &str, currency: &str) -> Result<String, WalletError> {
    RateTable::default().convert_to_token(amount, currency)
}

/// Location → currency mapping used by the payment form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationMap {
    entries: BTreeMap<String, String>,
}

impl Default for LocationMap {
    fn default() -> Self {
        Self {
            entries: [("USA", "USD"), ("India", "INR"), ("EU", "EUR")]
                .into_iter()
                .map(|(l, c)| (l.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl LocationMap {
    pub fn currency_for(&self, location: &str) -> Option<&str> {
        self.entries.get(location).map(String::as_str)
    }

    pub fn with_location(mut self, location: &str, currency: &str) -> Self {
        self.entries
            .insert(location.to_string(), currency.to_string());
        self
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

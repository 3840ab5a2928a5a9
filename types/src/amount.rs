//! Native asset amounts.
//!
//! Amounts are fixed-point integers counted in stroops (10^-7 of one unit),
//! matching the ledger's own representation. Parsing is strict: plain decimal
//! notation, at most seven fractional digits, no sign, and the result must fit
//! in an `i64`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::RemitError;

/// An amount of the native asset, stored as stroops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Number of fractional digits the ledger keeps.
    pub const DECIMALS: usize = 7;

    /// Stroops in one whole unit.
    pub const STROOPS_PER_UNIT: i64 = 10_000_000;

    pub const MAX: Self = Self(i64::MAX);

    pub fn from_stroops(stroops: i64) -> Self {
        Self(stroops)
    }

    pub fn stroops(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal string such as `"12.5"` or `"100.0000000"`.
    pub fn parse(value: &str) -> Result<Self, RemitError> {
        let invalid = |reason: &str| RemitError::InvalidAmount {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let (whole, frac) = match value.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (value, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a non-negative decimal number"));
        }

        let frac = match frac {
            None => "",
            Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid("expected digits after the decimal point"));
            }
            Some(f) if f.len() > Self::DECIMALS => {
                return Err(invalid("more than 7 decimal places"));
            }
            Some(f) => f,
        };

        let whole: i64 = whole
            .trim_start_matches('0')
            .parse::<i64>()
            .or_else(|e| if whole.bytes().all(|b| b == b'0') { Ok(0) } else { Err(e) })
            .map_err(|_| invalid("amount too large"))?;

        let mut frac_stroops: i64 = 0;
        for (i, b) in frac.bytes().enumerate() {
            let digit = (b - b'0') as i64;
            frac_stroops += digit * 10i64.pow((Self::DECIMALS - 1 - i) as u32);
        }

        whole
            .checked_mul(Self::STROOPS_PER_UNIT)
            .and_then(|s| s.checked_add(frac_stroops))
            .map(Self)
            .ok_or_else(|| invalid("amount too large"))
    }

    /// Parse an amount that must be strictly greater than zero.
    pub fn parse_positive(value: &str) -> Result<Self, RemitError> {
        let amount = Self::parse(value)?;
        if !amount.is_positive() {
            return Err(RemitError::InvalidAmount {
                value: value.to_string(),
                reason: "amount must be positive".to_string(),
            });
        }
        Ok(amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = Self::STROOPS_PER_UNIT as u64;
        write!(f, "{sign}{}.{:07}", abs / unit, abs % unit)
    }
}

impl FromStr for Amount {
    type Err = RemitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

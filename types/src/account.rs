//! Ledger account identifiers and secret seeds in StrKey form.
//!
//! Both are 56-character RFC 4648 base32 strings. Public account ids start with
//! `G`, secret seeds with `S`. Only the shape is checked here; the checksum and
//! key decoding live in `remit_crypto::strkey`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::RemitError;

/// Length of every encoded ed25519 StrKey.
pub const STRKEY_LEN: usize = 56;

fn is_base32_char(c: u8) -> bool {
    matches!(c, b'A'..=b'Z' | b'2'..=b'7')
}

fn has_strkey_shape(s: &str, prefix: u8) -> bool {
    s.len() == STRKEY_LEN && s.as_bytes()[0] == prefix && s.bytes().all(is_base32_char)
}

/// A public account identifier, always prefixed with `G`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// The leading character of every account id.
    pub const PREFIX: char = 'G';

    /// Wrap a string that has the shape of an account id.
    pub fn new(raw: impl Into<String>) -> Result<Self, RemitError> {
        let s = raw.into();
        if has_strkey_shape(&s, Self::PREFIX as u8) {
            Ok(Self(s))
        } else {
            Err(RemitError::InvalidAccountId(s))
        }
    }

    /// Return the raw StrKey string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines: `GABC…WXYZ`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..4], &self.0[STRKEY_LEN - 4..])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = RemitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// A secret seed, always prefixed with `S`.
///
/// Does not implement `Serialize`, `Clone` or a revealing `Debug`. The string is
/// zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed(String);

impl SecretSeed {
    /// The leading character of every secret seed.
    pub const PREFIX: char = 'S';

    pub fn new(raw: impl Into<String>) -> Result<Self, RemitError> {
        let mut s = raw.into();
        if has_strkey_shape(&s, Self::PREFIX as u8) {
            Ok(Self(s))
        } else {
            s.zeroize();
            Err(RemitError::InvalidSecretSeed)
        }
    }

    /// Expose the encoded seed. Callers must not log or persist it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(<redacted>)")
    }
}

impl<'de> Deserialize<'de> for SecretSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

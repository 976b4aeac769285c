//! Polish tax identification number (NIP).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a raw string is not a valid NIP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NipError {
    /// Nothing left after stripping separators.
    #[error("NIP must not be blank")]
    Blank,

    /// Wrong number of characters.
    #[error("NIP must have exactly 10 digits, got {0}")]
    Length(usize),

    /// Contains something other than ASCII digits.
    #[error("NIP must consist of digits only")]
    NonDigit,
}

/// A 10-digit Polish tax identification number.
///
/// Dashes and spaces are stripped on parse, so `679-319-41-13` and
/// `6793194113` are the same NIP. The NIP of the filing company also
/// identifies the tenant that owns invoices and declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nip(String);

impl Nip {
    /// Required number of digits.
    pub const LEN: usize = 10;

    /// Parses a NIP, stripping `-` and spaces first.
    pub fn parse(raw: &str) -> Result<Self, NipError> {
        let digits: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
        if digits.trim().is_empty() {
            return Err(NipError::Blank);
        }
        let len = digits.chars().count();
        if len != Self::LEN {
            return Err(NipError::Length(len));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NipError::NonDigit);
        }
        Ok(Self(digits))
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Nip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Nip {
    type Err = NipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Nip {
    type Error = NipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nip> for String {
    fn from(nip: Nip) -> Self {
        nip.0
    }
}

impl AsRef<str> for Nip {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

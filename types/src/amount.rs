//! Token amount type.
//!
//! Amounts are fixed-point integers (u128) in base units to avoid floating-point errors.
//! One whole token is [`TOKEN_UNIT`] base units (18 decimals).

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal places of one whole token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Base units per whole token.
pub const TOKEN_UNIT: u128 = 10u128.pow(TOKEN_DECIMALS);

/// An amount of the membership token, in base units.
///
/// Serialized as a decimal string of base units so that values beyond
/// 64 bits survive JSON and TOML unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens to base units. Saturates at `u128::MAX`.
    pub const fn from_tokens(tokens: u128) -> Self {
        Self(tokens.saturating_mul(TOKEN_UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a human decimal token amount such as `"100"` or `"0.25"`.
    pub fn from_decimal_str(s: &str) -> Result<Self, TypesError> {
        let invalid = |why: &str| TypesError::InvalidAmount(format!("{s}: {why}"));
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("empty"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }
        if frac.len() > TOKEN_DECIMALS as usize {
            return Err(invalid("more than 18 fractional digits"));
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("overflow"))?
        };
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = TOKEN_DECIMALS as usize);
            padded.parse().map_err(|_| invalid("overflow"))?
        };
        whole
            .checked_mul(TOKEN_UNIT)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / TOKEN_UNIT;
        let frac = self.0 % TOKEN_UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0>width$}", width = TOKEN_DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|e| TypesError::InvalidAmount(format!("{s}: {e}")))
    }
}

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.0.to_string()
    }
}

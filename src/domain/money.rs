use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by every ledger amount.
pub const SCALE: u32 = 2;

/// A strictly positive payment amount with at most two fractional digits.
///
/// Wraps `rust_decimal::Decimal` so that every balance computation stays exact;
/// there is no way to build an `Amount` from a float.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "{value} is not a positive amount"
            )));
        }
        if value.normalize().scale() > SCALE {
            return Err(LedgerError::InvalidAmount(format!(
                "{value} has more than {SCALE} fractional digits"
            )));
        }
        Ok(Self(value))
    }

    /// Parses the text a participant typed, which must look like `12` or `12.50`.
    /// Surrounding whitespace is not accepted.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || LedgerError::InvalidAmount(format!("'{text}' is not a valid amount"));

        let (units, cents) = match text.split_once('.') {
            Some((units, cents)) => (units, Some(cents)),
            None => (text, None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(units) {
            return Err(malformed());
        }
        if let Some(cents) = cents
            && (cents.len() != SCALE as usize || !all_digits(cents))
        {
            return Err(malformed());
        }

        let value = Decimal::from_str(text).map_err(|_| malformed())?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_money(self.0))
    }
}

/// Renders a ledger value with exactly two fractional digits.
pub fn format_money(value: Decimal) -> String {
    let mut value = value.round_dp(SCALE);
    value.rescale(SCALE);
    value.to_string()
}

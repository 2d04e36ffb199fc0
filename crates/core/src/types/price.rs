//! Monetary amounts using decimal arithmetic.
//!
//! The backend sends amounts as plain JSON numbers in the store currency.
//! `Price` keeps them as [`Decimal`] so comparisons such as
//! `price <= regular_price` are exact.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    Invalid(String),
    /// The input is negative.
    #[error("amount cannot be negative")]
    Negative,
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Parse user input such as `"499.50"`. Negative amounts are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the input is not a number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.trim().to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Price::parse(" 499.5 ").unwrap().to_string(), "499.50");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let p: Price = serde_json::from_str("150").unwrap();
        assert_eq!(p, Price::from_units(150));

        let p: Price = serde_json::from_str("99.99").unwrap();
        assert_eq!(p.to_string(), "99.99");
    }

    #[test]
    fn test_ordering_and_sum() {
        assert!(Price::from_units(500) > Price::from_units(300));
        let total: Price = [Price::from_units(1), Price::from_units(2)].into_iter().sum();
        assert_eq!(total, Price::from_units(3));
    }
}

//! Commission percentages
//!
//! A pack tier, an agent's effective rate and an invoice's snapshot rate are
//! all expressed as a percentage between 0 and 100, kept as a `Decimal` so
//! that commission amounts are exact.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when building a percentage
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentageError {
    #[error("Percentage out of range [0, 100]: {0}")]
    OutOfRange(Decimal),
}

/// A percentage rate (e.g. 84 for 84%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    /// Creates a percentage, rejecting values outside `[0, 100]`
    pub fn new(value: Decimal) -> Result<Self, PercentageError> {
        if (value.is_sign_negative() && !value.is_zero()) || value > dec!(100) {
            return Err(PercentageError::OutOfRange(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Returns the percentage value (84 for 84%)
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a fraction (0.84 for 84%)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// Applies this percentage to an amount: `amount * percentage / 100`
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount * self.0 / dec!(100)
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = PercentageError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(p: Percentage) -> Decimal {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.round_dp(4).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let p = Percentage::new(dec!(80)).unwrap();
        assert_eq!(p.apply(dec!(95000)), dec!(76000));
    }

    #[test]
    fn test_bounds() {
        assert!(Percentage::new(dec!(0)).is_ok());
        assert!(Percentage::new(dec!(100)).is_ok());
        assert_eq!(
            Percentage::new(dec!(-1)),
            Err(PercentageError::OutOfRange(dec!(-1)))
        );
        assert!(Percentage::new(dec!(100.01)).is_err());
    }

    #[test]
    fn test_ordering_follows_value() {
        let low = Percentage::new(dec!(72)).unwrap();
        let high = Percentage::new(dec!(88)).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_display() {
        let p = Percentage::new(dec!(84.50)).unwrap();
        assert_eq!(p.to_string(), "84.5%");
        assert_eq!(p.as_fraction(), dec!(0.845));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn apply_is_monotonic_in_rate(
            amount in 0i64..1_000_000_000i64,
            a in 0u32..=10000u32,
            b in 0u32..=10000u32,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Percentage::new(Decimal::new(lo as i64, 2)).unwrap();
            let hi = Percentage::new(Decimal::new(hi as i64, 2)).unwrap();
            let amount = Decimal::new(amount, 2);
            prop_assert!(lo.apply(amount) <= hi.apply(amount));
        }
    }
}

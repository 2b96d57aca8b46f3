//! Commission packs and their tier bands
//!
//! A pack is the commercial offer an agent subscribes to: a monthly fee and a
//! progressive scale mapping the agent's cumulative revenue to the share of
//! commission the agent keeps.
//!
//! # Range invariants
//!
//! - ranges are sorted by `min_amount` and the first one starts at 0
//! - consecutive ranges are adjacent: `max < next.min <= max + 1`
//! - only the last range is unbounded (`max_amount = None`)
//! - percentages never decrease from one range to the next

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{PackId, Percentage};
use crate::error::CommissionError;

/// One tier of a pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRange {
    /// Inclusive lower bound of cumulative revenue
    pub min_amount: Decimal,
    /// Inclusive upper bound; `None` for the top tier
    pub max_amount: Option<Decimal>,
    /// Share of commission kept by the agent in this tier
    pub percentage: Percentage,
}

impl CommissionRange {
    pub fn new(min_amount: Decimal, max_amount: Option<Decimal>, percentage: Percentage) -> Self {
        Self {
            min_amount,
            max_amount,
            percentage,
        }
    }

    /// Returns true if `amount` lies in `[min_amount, max_amount]`
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && self.max_amount.map_or(true, |max| amount <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_amount.is_none()
    }
}

/// Monthly subscription fee of a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFee {
    pub pre_tax: Decimal,
    pub post_tax: Decimal,
}

impl MonthlyFee {
    pub fn new(pre_tax: Decimal, post_tax: Decimal) -> Self {
        Self { pre_tax, post_tax }
    }

    /// Tax included in the post-tax fee
    pub fn tax_amount(&self) -> Decimal {
        self.post_tax - self.pre_tax
    }

    /// Applied tax rate, as a percentage of the pre-tax fee
    pub fn tax_rate(&self) -> Option<Decimal> {
        if self.pre_tax.is_zero() {
            return None;
        }
        Some((self.tax_amount() / self.pre_tax * dec!(100)).round_dp(2))
    }
}

/// Position of an amount within a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPosition<'a> {
    /// Index of the matching range
    pub index: usize,
    pub range: &'a CommissionRange,
    /// The range immediately above, absent in the top tier
    pub next: Option<&'a CommissionRange>,
}

impl TierPosition<'_> {
    pub fn is_top_tier(&self) -> bool {
        self.next.is_none()
    }
}

/// A commission pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPack {
    pub id: PackId,
    pub name: String,
    pub year: i32,
    pub is_active: bool,
    pub monthly_fee: MonthlyFee,
    /// Percentage paid to an agent who refers a deal to a colleague
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_rate: Option<Percentage>,
    pub ranges: Vec<CommissionRange>,
}

impl CommissionPack {
    /// Finds the tier containing `amount`
    ///
    /// Ranges are scanned in order and the first match wins. Bands with
    /// integer bounds (`[0, 35000]`, `[35001, 70000]`) leave a fractional gap
    /// between them; an amount in that gap has not reached the next band's
    /// minimum and stays in the lower band.
    ///
    /// # Errors
    ///
    /// `CommissionError::Configuration` if `amount` is negative or no range
    /// covers it. A malformed pack is never silently defaulted to a tier.
    pub fn range_for(&self, amount: Decimal) -> Result<TierPosition<'_>, CommissionError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CommissionError::configuration(format!(
                "pack {} cannot rate a negative amount ({})",
                self.id, amount
            )));
        }

        for (index, range) in self.ranges.iter().enumerate() {
            let next = self.ranges.get(index + 1);
            let in_gap = match (range.max_amount, next) {
                (Some(max), Some(next)) => {
                    amount > max && amount < next.min_amount && next.min_amount - max <= dec!(1)
                }
                _ => false,
            };

            if range.contains(amount) || (amount >= range.min_amount && in_gap) {
                return Ok(TierPosition { index, range, next });
            }
        }

        Err(CommissionError::configuration(format!(
            "pack {} has no range covering {}",
            self.id, amount
        )))
    }

    /// Commission earned on a referred deal, if the pack pays referrals
    pub fn referral_commission(&self, amount: Decimal) -> Option<Decimal> {
        self.referral_rate.map(|rate| rate.apply(amount).round_dp(2))
    }

    /// Checks the range invariants
    pub fn validate(&self) -> Result<(), CommissionError> {
        let invalid = |reason: String| {
            Err(CommissionError::configuration(format!("pack {}: {}", self.id, reason)))
        };

        let (first, last) = match (self.ranges.first(), self.ranges.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return invalid("no ranges defined".to_string()),
        };

        if !first.min_amount.is_zero() {
            return invalid(format!("first range starts at {}, not 0", first.min_amount));
        }
        if !last.is_unbounded() {
            return invalid("last range must be unbounded".to_string());
        }

        for (i, pair) in self.ranges.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            let max = match current.max_amount {
                Some(max) => max,
                None => return invalid(format!("range {} is unbounded but not last", i)),
            };
            if max < current.min_amount {
                return invalid(format!("range {} ends before it starts", i));
            }
            if next.min_amount <= max {
                return invalid(format!("ranges {} and {} overlap", i, i + 1));
            }
            if next.min_amount - max > dec!(1) {
                return invalid(format!("gap between ranges {} and {}", i, i + 1));
            }
            if next.percentage < current.percentage {
                return invalid(format!(
                    "range {} pays {} after {} in range {}",
                    i + 1,
                    next.percentage,
                    current.percentage,
                    i
                ));
            }
        }

        Ok(())
    }
}

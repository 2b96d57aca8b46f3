//! Commission calculator
//!
//! Pure functions over the pack catalog: tier lookup, what-if simulation and
//! progress towards the next tier. This is the only place where a revenue
//! total is turned into a percentage.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use core_kernel::{PackId, Percentage};
use crate::catalog::PackCatalog;
use crate::error::CommissionError;
use crate::pack::CommissionRange;

/// Outcome of a what-if simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub base_amount: Decimal,
    pub additional_amount: Decimal,
    pub estimated_total: Decimal,
    pub current_percentage: Percentage,
    pub estimated_percentage: Percentage,
    pub current_commission: Decimal,
    pub estimated_commission: Decimal,
    pub increased_commission: Decimal,
    /// Minimum amount of the tier above the estimated one
    pub next_threshold: Option<Decimal>,
}

/// How far an agent is into the current tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProgress {
    pub current_percentage: Percentage,
    pub next_percentage: Percentage,
    pub amount_needed: Decimal,
    /// Position within the current tier, from 0 to 100
    pub progress: Decimal,
}

/// Commission calculator bound to a pack catalog
#[derive(Debug, Clone)]
pub struct CommissionCalculator {
    catalog: Arc<PackCatalog>,
}

impl CommissionCalculator {
    pub fn new(catalog: Arc<PackCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PackCatalog {
        &self.catalog
    }

    /// Percentage earned on a cumulative `amount` under `pack_id`
    ///
    /// # Errors
    ///
    /// - `PackNotFound` for an unknown pack
    /// - `Configuration` if no range covers the amount
    pub fn percentage_for(&self, amount: Decimal, pack_id: &PackId) -> Result<Percentage, CommissionError> {
        let pack = self.catalog.get_by_id(pack_id)?;
        Ok(pack.range_for(amount)?.range.percentage)
    }

    /// Commission kept by the agent on `amount` at the tier `amount` reaches
    pub fn commission_for(&self, amount: Decimal, pack_id: &PackId) -> Result<Decimal, CommissionError> {
        let percentage = self.percentage_for(amount, pack_id)?;
        Ok(percentage.apply(amount).round_dp(2))
    }

    /// Ranges of a pack, for dashboards
    pub fn tier_table(&self, pack_id: &PackId) -> Result<Vec<CommissionRange>, CommissionError> {
        Ok(self.catalog.get_by_id(pack_id)?.ranges.clone())
    }

    /// Estimates the effect of `additional_amount` of future revenue
    ///
    /// While the estimated total stays in the same tier as `base_amount`,
    /// the agent keeps the caller-supplied `current_percentage`; a tier
    /// change switches to the percentage of the new tier.
    pub fn simulate(
        &self,
        base_amount: Decimal,
        additional_amount: Decimal,
        current_percentage: Percentage,
        pack_id: &PackId,
    ) -> Result<Simulation, CommissionError> {
        if base_amount.is_sign_negative() && !base_amount.is_zero() {
            return Err(CommissionError::validation("base amount must not be negative"));
        }
        if additional_amount.is_sign_negative() && !additional_amount.is_zero() {
            return Err(CommissionError::validation("additional amount must not be negative"));
        }

        let pack = self.catalog.get_by_id(pack_id)?;
        let estimated_total = base_amount + additional_amount;

        let base_position = pack.range_for(base_amount)?;
        let estimated_position = pack.range_for(estimated_total)?;

        let estimated_percentage = if estimated_position.index == base_position.index {
            current_percentage
        } else {
            estimated_position.range.percentage
        };

        let current_commission = current_percentage.apply(base_amount).round_dp(2);
        let estimated_commission = estimated_percentage.apply(estimated_total).round_dp(2);

        Ok(Simulation {
            base_amount,
            additional_amount,
            estimated_total,
            current_percentage,
            estimated_percentage,
            current_commission,
            estimated_commission,
            increased_commission: estimated_commission - current_commission,
            next_threshold: estimated_position.next.map(|next| next.min_amount),
        })
    }

    /// Progress of `total_amount` through its tier
    pub fn progress_to_next_tier(
        &self,
        total_amount: Decimal,
        pack_id: &PackId,
    ) -> Result<TierProgress, CommissionError> {
        let pack = self.catalog.get_by_id(pack_id)?;
        let position = pack.range_for(total_amount)?;
        let current_percentage = position.range.percentage;

        let next = match position.next {
            Some(next) => next,
            None => {
                return Ok(TierProgress {
                    current_percentage,
                    next_percentage: current_percentage,
                    amount_needed: Decimal::ZERO,
                    progress: dec!(100),
                });
            }
        };

        let amount_needed = (next.min_amount - total_amount).max(Decimal::ZERO);

        let floor = position.range.min_amount;
        let ceiling = position.range.max_amount.unwrap_or(next.min_amount);
        let span = ceiling - floor;
        let progress = if span <= Decimal::ZERO {
            dec!(100)
        } else {
            ((total_amount - floor) / span * dec!(100))
                .clamp(Decimal::ZERO, dec!(100))
                .round_dp(2)
        };

        Ok(TierProgress {
            current_percentage,
            next_percentage: next.percentage,
            amount_needed,
            progress,
        })
    }
}

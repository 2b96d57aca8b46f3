//! Agent commission aggregate
//!
//! Caches an agent's revenue totals and the percentage they earn under the
//! selected pack. The ledger is the source of truth: `total_amount` always
//! equals the sum of the agent's revenue records, and `current_percentage`
//! always equals the pack tier for that total.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AgentId, PackId, Percentage, ValidPeriod};
use crate::revenue::RevenueSource;

/// Revenue totals split by business line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub sales_amount: Decimal,
    pub rental_amount: Decimal,
    pub property_management_amount: Decimal,
}

impl RevenueBreakdown {
    pub fn total(&self) -> Decimal {
        self.sales_amount + self.rental_amount + self.property_management_amount
    }

    pub fn get(&self, source: RevenueSource) -> Decimal {
        match source {
            RevenueSource::Sale => self.sales_amount,
            RevenueSource::Rental => self.rental_amount,
            RevenueSource::PropertyManagement => self.property_management_amount,
        }
    }

    pub fn add(&mut self, source: RevenueSource, amount: Decimal) {
        match source {
            RevenueSource::Sale => self.sales_amount += amount,
            RevenueSource::Rental => self.rental_amount += amount,
            RevenueSource::PropertyManagement => self.property_management_amount += amount,
        }
    }
}

/// An agent's commission state over one validity window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCommission {
    pub agent_id: AgentId,
    pub pack_id: PackId,
    pub current_percentage: Percentage,
    pub sales_amount: Decimal,
    pub rental_amount: Decimal,
    pub property_management_amount: Decimal,
    pub total_amount: Decimal,
    pub valid_period: ValidPeriod,
    pub updated_at: DateTime<Utc>,
}

impl AgentCommission {
    /// Opens a record with no revenue yet
    pub fn new(
        agent_id: AgentId,
        pack_id: PackId,
        starting_percentage: Percentage,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            agent_id,
            pack_id,
            current_percentage: starting_percentage,
            sales_amount: Decimal::ZERO,
            rental_amount: Decimal::ZERO,
            property_management_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            valid_period: ValidPeriod::from(start_date),
            updated_at: Utc::now(),
        }
    }

    pub fn breakdown(&self) -> RevenueBreakdown {
        RevenueBreakdown {
            sales_amount: self.sales_amount,
            rental_amount: self.rental_amount,
            property_management_amount: self.property_management_amount,
        }
    }

    /// Returns a copy with `amount` added to the `source` subtotal
    ///
    /// The percentage is left untouched; the ledger recomputes it against
    /// the pack before committing.
    pub fn credited(&self, source: RevenueSource, amount: Decimal) -> Self {
        let mut breakdown = self.breakdown();
        breakdown.add(source, amount);

        let mut next = self.clone();
        next.set_breakdown(breakdown);
        next
    }

    /// Returns a copy opening a new window on another pack, carrying the totals
    pub fn reassigned(&self, pack_id: PackId, percentage: Percentage, start_date: NaiveDate) -> Self {
        Self {
            pack_id,
            current_percentage: percentage,
            valid_period: ValidPeriod::from(start_date),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Returns true if the cached total matches its subtotals
    pub fn is_consistent(&self) -> bool {
        self.total_amount == self.breakdown().total()
    }

    fn set_breakdown(&mut self, breakdown: RevenueBreakdown) {
        self.sales_amount = breakdown.sales_amount;
        self.rental_amount = breakdown.rental_amount;
        self.property_management_amount = breakdown.property_management_amount;
        self.total_amount = breakdown.total();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> AgentCommission {
        AgentCommission::new(
            AgentId::new(),
            PackId::from("silver"),
            Percentage::new(dec!(72)).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_credited_updates_matching_subtotal() {
        let start = record();
        let next = start
            .credited(RevenueSource::Sale, dec!(60000))
            .credited(RevenueSource::Rental, dec!(20000))
            .credited(RevenueSource::PropertyManagement, dec!(15000));

        assert_eq!(next.sales_amount, dec!(60000));
        assert_eq!(next.rental_amount, dec!(20000));
        assert_eq!(next.property_management_amount, dec!(15000));
        assert_eq!(next.total_amount, dec!(95000));
        assert!(next.is_consistent());
        assert_eq!(start.total_amount, dec!(0));
    }

    #[test]
    fn test_reassigned_carries_totals() {
        let current = record().credited(RevenueSource::Sale, dec!(40000));
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let next = current.reassigned(PackId::from("gold"), Percentage::new(dec!(80)).unwrap(), start);

        assert_eq!(next.pack_id, PackId::from("gold"));
        assert_eq!(next.total_amount, dec!(40000));
        assert_eq!(next.valid_period.start_date, start);
        assert!(next.valid_period.is_open());
    }

    #[test]
    fn test_breakdown_get() {
        let current = record().credited(RevenueSource::Rental, dec!(1500));
        let breakdown = current.breakdown();
        assert_eq!(breakdown.get(RevenueSource::Rental), dec!(1500));
        assert_eq!(breakdown.get(RevenueSource::Sale), dec!(0));
    }
}

//! Test Data Builders
//!
//! Builders with sensible defaults so that tests only spell out the fields
//! they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AgentId, PackId};
use domain_commission::{CommissionPack, CommissionRange, MonthlyFee, NewRevenue, RevenueSource};

use crate::fixtures::{percentage, DateFixtures, IdFixtures};

/// Builder for revenue events
pub struct NewRevenueBuilder {
    agent_id: AgentId,
    source: RevenueSource,
    amount: Decimal,
    date: NaiveDate,
    property_address: Option<String>,
    client_name: Option<String>,
}

impl Default for NewRevenueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewRevenueBuilder {
    /// A 10 000 sale on mid-year for a fresh agent
    pub fn new() -> Self {
        Self {
            agent_id: IdFixtures::agent_id(),
            source: RevenueSource::Sale,
            amount: dec!(10000),
            date: DateFixtures::mid_year(),
            property_address: None,
            client_name: None,
        }
    }

    pub fn for_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = agent_id;
        self
    }

    pub fn sale(mut self, amount: Decimal) -> Self {
        self.source = RevenueSource::Sale;
        self.amount = amount;
        self
    }

    pub fn rental(mut self, amount: Decimal) -> Self {
        self.source = RevenueSource::Rental;
        self.amount = amount;
        self
    }

    pub fn property_management(mut self, amount: Decimal) -> Self {
        self.source = RevenueSource::PropertyManagement;
        self.amount = amount;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn at_address(mut self, address: impl Into<String>) -> Self {
        self.property_address = Some(address.into());
        self
    }

    pub fn for_client(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn build(self) -> NewRevenue {
        let mut request = NewRevenue::new(self.agent_id, self.source, self.amount, self.date);
        request.property_address = self.property_address;
        request.client_name = self.client_name;
        request
    }
}

/// Builder for commission packs
///
/// Tiers are given as `(upper bound, percentage)`; each tier starts one unit
/// above the previous bound and the last tier added with `top_tier` is
/// unbounded.
pub struct CommissionPackBuilder {
    id: PackId,
    name: String,
    year: i32,
    is_active: bool,
    monthly_fee: MonthlyFee,
    ranges: Vec<CommissionRange>,
}

impl CommissionPackBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: PackId::from(id),
            name: id.to_string(),
            year: 2024,
            is_active: true,
            monthly_fee: MonthlyFee::new(dec!(100), dec!(120)),
            ranges: Vec::new(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn tier(mut self, max_amount: Decimal, pct: Decimal) -> Self {
        let min_amount = self.next_min();
        self.ranges.push(CommissionRange::new(min_amount, Some(max_amount), percentage(pct)));
        self
    }

    pub fn top_tier(mut self, pct: Decimal) -> Self {
        let min_amount = self.next_min();
        self.ranges.push(CommissionRange::new(min_amount, None, percentage(pct)));
        self
    }

    pub fn build(self) -> CommissionPack {
        CommissionPack {
            id: self.id,
            name: self.name,
            year: self.year,
            is_active: self.is_active,
            monthly_fee: self.monthly_fee,
            referral_rate: None,
            ranges: self.ranges,
        }
    }

    fn next_min(&self) -> Decimal {
        self.ranges
            .last()
            .and_then(|r| r.max_amount)
            .map_or(Decimal::ZERO, |max| max + Decimal::ONE)
    }
}

//! Pre-built Test Fixtures
//!
//! Reference packs and dates shared by the test suites. The Silver pack is
//! the scale used throughout the agency's documentation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{AgentId, PackId, Percentage};
use domain_commission::{CommissionPack, CommissionRange, MonthlyFee, PackCatalog};

/// Fixture for commission packs
pub struct PackFixtures;

impl PackFixtures {
    pub fn silver_id() -> PackId {
        PackId::from("silver")
    }

    pub fn gold_id() -> PackId {
        PackId::from("gold")
    }

    pub fn starter_id() -> PackId {
        PackId::from("starter")
    }

    /// Five tiers from 72% to 88%
    pub fn silver() -> CommissionPack {
        CommissionPack {
            id: Self::silver_id(),
            name: "Silver".to_string(),
            year: 2024,
            is_active: true,
            monthly_fee: MonthlyFee::new(dec!(250), dec!(300)),
            referral_rate: Some(percentage(dec!(10))),
            ranges: vec![
                range(dec!(0), Some(dec!(35000)), dec!(72)),
                range(dec!(35001), Some(dec!(70000)), dec!(76)),
                range(dec!(70001), Some(dec!(100000)), dec!(80)),
                range(dec!(100001), Some(dec!(150000)), dec!(84)),
                range(dec!(150001), None, dec!(88)),
            ],
        }
    }

    /// Three tiers from 75% to 90%
    pub fn gold() -> CommissionPack {
        CommissionPack {
            id: Self::gold_id(),
            name: "Gold".to_string(),
            year: 2024,
            is_active: true,
            monthly_fee: MonthlyFee::new(dec!(400), dec!(480)),
            referral_rate: Some(percentage(dec!(15))),
            ranges: vec![
                range(dec!(0), Some(dec!(50000)), dec!(75)),
                range(dec!(50001), Some(dec!(120000)), dec!(82)),
                range(dec!(120001), None, dec!(90)),
            ],
        }
    }

    /// A retired pack, kept for agents still on it
    pub fn starter() -> CommissionPack {
        CommissionPack {
            id: Self::starter_id(),
            name: "Starter".to_string(),
            year: 2023,
            is_active: false,
            monthly_fee: MonthlyFee::new(dec!(99), dec!(118.80)),
            referral_rate: None,
            ranges: vec![
                range(dec!(0), Some(dec!(50000)), dec!(70)),
                range(dec!(50001), None, dec!(75)),
            ],
        }
    }

    pub fn all() -> Vec<CommissionPack> {
        vec![Self::silver(), Self::gold(), Self::starter()]
    }

    pub fn catalog() -> Arc<PackCatalog> {
        match PackCatalog::new(Self::all()) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => panic!("fixture packs must be valid: {}", e),
        }
    }

    /// The fixture packs as a JSON pack file
    pub fn json() -> String {
        match serde_json::to_string_pretty(&Self::all()) {
            Ok(json) => json,
            Err(e) => panic!("fixture packs must serialize: {}", e),
        }
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn year_start() -> NaiveDate {
        date(2024, 1, 1)
    }

    pub fn mid_year() -> NaiveDate {
        date(2024, 6, 15)
    }

    pub fn pack_change() -> NaiveDate {
        date(2024, 9, 1)
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn agent_id() -> AgentId {
        AgentId::new_v7()
    }
}

/// Shorthand for a valid percentage
pub fn percentage(value: Decimal) -> Percentage {
    match Percentage::new(value) {
        Ok(p) => p,
        Err(e) => panic!("invalid fixture percentage: {}", e),
    }
}

fn range(min: Decimal, max: Option<Decimal>, pct: Decimal) -> CommissionRange {
    CommissionRange::new(min, max, percentage(pct))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(y, m, d) {
        Some(date) => date,
        None => panic!("invalid fixture date {}-{}-{}", y, m, d),
    }
}

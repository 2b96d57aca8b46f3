//! Property-Based Test Generators
//!
//! Proptest strategies that respect domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{PackId, Percentage};
use domain_commission::{CommissionPack, CommissionRange, MonthlyFee, RevenueSource};

/// Non-negative amounts with cents, up to 10 million
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Whole amounts, which land exactly on tier bounds more often
pub fn whole_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..500_000i64).prop_map(Decimal::from)
}

pub fn revenue_source_strategy() -> impl Strategy<Value = RevenueSource> {
    prop_oneof![
        Just(RevenueSource::Sale),
        Just(RevenueSource::Rental),
        Just(RevenueSource::PropertyManagement),
    ]
}

/// Percentages with up to two decimals
pub fn percentage_strategy() -> impl Strategy<Value = Percentage> {
    (0u32..=10_000u32).prop_map(|basis| {
        Percentage::new(Decimal::new(i64::from(basis), 2)).unwrap_or(Percentage::ZERO)
    })
}

/// Well-formed packs: integer-adjacent bands, unbounded top tier,
/// non-decreasing percentages
pub fn pack_strategy() -> impl Strategy<Value = CommissionPack> {
    (
        prop::collection::vec(1i64..200_000i64, 0..6),
        prop::collection::vec(0u32..=20u32, 1..7),
        0u32..=60u32,
    )
        .prop_map(|(widths, steps, base)| {
            let tiers = widths.len() + 1;
            let mut percentages = Vec::with_capacity(tiers);
            let mut current = base;
            for i in 0..tiers {
                current = (current + steps.get(i).copied().unwrap_or(0)).min(100);
                percentages.push(Percentage::new(Decimal::from(current)).unwrap_or(Percentage::ZERO));
            }

            let mut ranges = Vec::with_capacity(tiers);
            let mut min_amount = Decimal::ZERO;
            for (width, pct) in widths.iter().zip(&percentages) {
                let max_amount = min_amount + Decimal::from(*width);
                ranges.push(CommissionRange::new(min_amount, Some(max_amount), *pct));
                min_amount = max_amount + Decimal::ONE;
            }
            let top = percentages.last().copied().unwrap_or(Percentage::ZERO);
            ranges.push(CommissionRange::new(min_amount, None, top));

            CommissionPack {
                id: PackId::from("generated"),
                name: "Generated".to_string(),
                year: 2024,
                is_active: true,
                monthly_fee: MonthlyFee::new(Decimal::ZERO, Decimal::ZERO),
                referral_rate: None,
                ranges,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_packs_are_valid(pack in pack_strategy()) {
            prop_assert!(pack.validate().is_ok());
        }

        #[test]
        fn generated_packs_cover_every_amount(pack in pack_strategy(), amount in amount_strategy()) {
            prop_assert!(pack.range_for(amount).is_ok());
        }
    }
}

//! Property tests over generated packs and revenue streams

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use commission_service::{CommissionEngine, EngineConfig};
use domain_commission::{CommissionCalculator, PackCatalog};
use std::sync::Arc;
use test_utils::{
    amount_strategy, assert_ledger_consistent, pack_strategy, percentage_strategy,
    revenue_source_strategy, whole_amount_strategy, IdFixtures, NewRevenueBuilder, PackFixtures,
};

fn calculator_for(pack: domain_commission::CommissionPack) -> CommissionCalculator {
    CommissionCalculator::new(Arc::new(PackCatalog::new(vec![pack]).unwrap()))
}

proptest! {
    #[test]
    fn every_amount_falls_in_one_tier(pack in pack_strategy(), amount in whole_amount_strategy()) {
        let matching = pack.ranges.iter().filter(|r| r.contains(amount)).count();
        prop_assert_eq!(matching, 1);
    }

    #[test]
    fn percentage_never_decreases(pack in pack_strategy(), a in amount_strategy(), b in amount_strategy()) {
        let calc = calculator_for(pack.clone());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calc.percentage_for(lo, &pack.id).unwrap() <= calc.percentage_for(hi, &pack.id).unwrap());
    }

    #[test]
    fn simulating_nothing_changes_nothing(
        pack in pack_strategy(),
        base in amount_strategy(),
        current in percentage_strategy(),
    ) {
        let calc = calculator_for(pack.clone());
        let sim = calc.simulate(base, Decimal::ZERO, current, &pack.id).unwrap();
        prop_assert_eq!(sim.estimated_total, base);
        prop_assert_eq!(sim.estimated_percentage, current);
        prop_assert_eq!(sim.increased_commission, Decimal::ZERO);
    }

    #[test]
    fn top_tier_saturates(pack in pack_strategy(), extra in amount_strategy()) {
        let calc = calculator_for(pack.clone());
        let top = pack.ranges.last().unwrap();
        let progress = calc.progress_to_next_tier(top.min_amount + extra, &pack.id).unwrap();
        prop_assert_eq!(progress.progress, dec!(100));
        prop_assert_eq!(progress.amount_needed, Decimal::ZERO);
        prop_assert_eq!(progress.next_percentage, top.percentage);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn engine_ledger_stays_consistent(
        events in prop::collection::vec((revenue_source_strategy(), amount_strategy()), 1..20)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let config = EngineConfig {
                default_pack_id: Some("gold".to_string()),
                ..EngineConfig::default()
            };
            let catalog = PackCatalog::new(PackFixtures::all()).unwrap();
            let engine = CommissionEngine::in_memory(catalog, &config).unwrap();
            let agent_id = IdFixtures::agent_id();

            for (source, amount) in &events {
                let builder = NewRevenueBuilder::new().for_agent(agent_id);
                let request = match source {
                    domain_commission::RevenueSource::Sale => builder.sale(*amount),
                    domain_commission::RevenueSource::Rental => builder.rental(*amount),
                    domain_commission::RevenueSource::PropertyManagement => builder.property_management(*amount),
                };
                engine.add_revenue(request.build()).await.unwrap();
            }

            let commission = engine.get_agent_commission(agent_id).await.unwrap();
            assert_ledger_consistent(&commission, &engine.get_agent_revenues(agent_id).await.unwrap());
            assert_eq!(
                commission.current_percentage,
                engine.percentage_for(commission.total_amount, &PackFixtures::gold_id()).unwrap()
            );
        });
    }
}

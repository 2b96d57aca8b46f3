//! Tests for domain_billing

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{AgentId, ErrorKind, InvoiceId, PackId, Percentage, UserId};
use domain_billing::{BillingError, InMemoryInvoicePort, InvoiceLifecycle, InvoiceStatus};
use domain_commission::{
    CommissionCalculator, CommissionError, CommissionPack, CommissionRange, InMemoryCommissionLedgerPort,
    MonthlyFee, NewRevenue, PackCatalog, RevenueLedger, RevenueRecord, RevenueSource,
};
use domain_notification::{InMemoryNotificationPort, NotificationStore, NotificationType};

fn pct(value: Decimal) -> Percentage {
    Percentage::new(value).unwrap()
}

fn catalog() -> PackCatalog {
    let silver = CommissionPack {
        id: PackId::from("silver"),
        name: "Silver".to_string(),
        year: 2024,
        is_active: true,
        monthly_fee: MonthlyFee::new(dec!(250), dec!(300)),
        referral_rate: None,
        ranges: vec![
            CommissionRange::new(dec!(0), Some(dec!(35000)), pct(dec!(72))),
            CommissionRange::new(dec!(35001), Some(dec!(70000)), pct(dec!(76))),
            CommissionRange::new(dec!(70001), Some(dec!(100000)), pct(dec!(80))),
            CommissionRange::new(dec!(100001), Some(dec!(150000)), pct(dec!(84))),
            CommissionRange::new(dec!(150001), None, pct(dec!(88))),
        ],
    };
    let flat = CommissionPack {
        id: PackId::from("flat"),
        name: "Flat".to_string(),
        year: 2024,
        is_active: true,
        monthly_fee: MonthlyFee::new(dec!(0), dec!(0)),
        referral_rate: None,
        ranges: vec![CommissionRange::new(dec!(0), None, pct(dec!(80)))],
    };
    PackCatalog::new(vec![silver, flat]).unwrap()
}

struct Harness {
    ledger: Arc<RevenueLedger>,
    lifecycle: InvoiceLifecycle,
    notifications: NotificationStore,
}

fn harness() -> Harness {
    let notifications = NotificationStore::new(Arc::new(InMemoryNotificationPort::new()));
    let ledger = Arc::new(
        RevenueLedger::new(
            Arc::new(InMemoryCommissionLedgerPort::new()),
            CommissionCalculator::new(Arc::new(catalog())),
            notifications.clone(),
        )
        .with_default_pack(PackId::from("flat")),
    );
    let lifecycle = InvoiceLifecycle::new(
        Arc::new(InMemoryInvoicePort::new()),
        Arc::clone(&ledger),
        notifications.clone(),
    );
    Harness { ledger, lifecycle, notifications }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
}

async fn sale(h: &Harness, agent_id: AgentId, amount: Decimal) -> RevenueRecord {
    h.ledger
        .add_revenue(
            NewRevenue::new(agent_id, RevenueSource::Sale, amount, date())
                .with_property_address("8 quai Saint-Antoine, Lyon")
                .with_client_name("M. et Mme Girard"),
        )
        .await
        .unwrap()
}

async fn count_of(h: &Harness, agent_id: AgentId, kind: NotificationType) -> usize {
    h.notifications
        .get_for_user(UserId::from(agent_id))
        .await
        .unwrap()
        .iter()
        .filter(|n| n.notification_type == kind)
        .count()
}

// ============================================================================
// Creation
// ============================================================================

mod creation {
    use super::*;

    #[tokio::test]
    async fn test_create_snapshots_rate() {
        let h = harness();
        let agent_id = AgentId::new();
        let record = sale(&h, agent_id, dec!(200000)).await;

        let invoice = h.lifecycle.create(&record, "Claire Dubois").await.unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.commission_rate, pct(dec!(80)));
        assert_eq!(invoice.commission_amount, dec!(160000));
        assert_eq!(invoice.revenue_id, record.id);
        assert_eq!(invoice.property_address, record.property_address);
        assert!(invoice.invoice_number.starts_with("FAC-"));
        assert_eq!(count_of(&h, agent_id, NotificationType::InvoiceSubmitted).await, 0);
    }

    #[tokio::test]
    async fn test_rate_frozen_across_pack_change() {
        let h = harness();
        let agent_id = AgentId::new();
        let record = sale(&h, agent_id, dec!(200000)).await;
        let invoice = h.lifecycle.create(&record, "Claire Dubois").await.unwrap();

        let switched = h
            .ledger
            .assign_pack(agent_id, PackId::from("silver"), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(switched.current_percentage, pct(dec!(88)));

        h.lifecycle.submit(invoice.id).await.unwrap();
        let stored = h.lifecycle.get(invoice.id).await.unwrap();
        assert_eq!(stored.commission_rate, pct(dec!(80)));
        assert_eq!(stored.commission_amount, dec!(160000));
    }

    #[tokio::test]
    async fn test_second_invoice_for_revenue_is_refused() {
        let h = harness();
        let record = sale(&h, AgentId::new(), dec!(5000)).await;
        h.lifecycle.create(&record, "Claire Dubois").await.unwrap();

        let err = h.lifecycle.create(&record, "Claire Dubois").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_blank_agent_name_is_refused() {
        let h = harness();
        let record = sale(&h, AgentId::new(), dec!(5000)).await;

        let err = h.lifecycle.create(&record, "   ").await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unrecorded_revenue_is_not_invoiced() {
        let h = harness();
        let agent_id = AgentId::new();
        sale(&h, agent_id, dec!(100)).await;
        let unrecorded = RevenueRecord::from_request(
            NewRevenue::new(agent_id, RevenueSource::Sale, dec!(1000000), date()),
            chrono::Utc::now(),
        );

        let err = h.lifecycle.create(&unrecorded, "Paul Henry").await.unwrap_err();
        assert!(matches!(err, BillingError::Commission(CommissionError::NotFound(_))));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(h.lifecycle.list_for_agent(agent_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_uses_ledger_copy_of_record() {
        let h = harness();
        let mut record = sale(&h, AgentId::new(), dec!(1000)).await;
        record.amount = dec!(999999);

        let invoice = h.lifecycle.create(&record, "Paul Henry").await.unwrap();
        assert_eq!(invoice.amount, dec!(1000));
        assert_eq!(invoice.commission_amount, dec!(800));
    }

    #[tokio::test]
    async fn test_invoice_numbers_are_sequential() {
        let h = harness();
        let agent_id = AgentId::new();
        let first = h.lifecycle.create(&sale(&h, agent_id, dec!(100)).await, "A").await.unwrap();
        let second = h.lifecycle.create(&sale(&h, agent_id, dec!(200)).await, "A").await.unwrap();

        assert!(first.invoice_number.ends_with("-00001"));
        assert!(second.invoice_number.ends_with("-00002"));

        let listed: Vec<_> = h.lifecycle.list_for_agent(agent_id).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(listed, vec![first.id, second.id]);
    }
}

// ============================================================================
// Workflow
// ============================================================================

mod workflow {
    use super::*;

    #[tokio::test]
    async fn test_full_workflow_notifies_each_step() {
        let h = harness();
        let agent_id = AgentId::new();
        let invoice = h.lifecycle.create(&sale(&h, agent_id, dec!(10000)).await, "Claire").await.unwrap();

        let submitted = h.lifecycle.submit(invoice.id).await.unwrap();
        assert_eq!(submitted.status, InvoiceStatus::Submitted);
        assert!(submitted.updated_at >= invoice.updated_at);

        h.lifecycle.approve(invoice.id).await.unwrap();
        let paid = h.lifecycle.mark_paid(invoice.id).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_at.is_some());

        assert_eq!(count_of(&h, agent_id, NotificationType::InvoiceSubmitted).await, 1);
        assert_eq!(count_of(&h, agent_id, NotificationType::InvoiceApproved).await, 1);
        assert_eq!(count_of(&h, agent_id, NotificationType::InvoicePaid).await, 1);

        let latest = h.notifications.get_for_user(UserId::from(agent_id)).await.unwrap().remove(0);
        assert_eq!(latest.notification_type, NotificationType::InvoicePaid);
        let paid_amount: Decimal = serde_json::from_value(latest.data.unwrap()["commission_amount"].clone()).unwrap();
        assert_eq!(paid_amount, dec!(8000));
    }

    #[tokio::test]
    async fn test_wrong_status_mutates_nothing() {
        let h = harness();
        let agent_id = AgentId::new();
        let invoice = h.lifecycle.create(&sale(&h, agent_id, dec!(10000)).await, "Claire").await.unwrap();
        let before = h.notifications.get_for_user(UserId::from(agent_id)).await.unwrap().len();

        let err = h.lifecycle.mark_paid(invoice.id).await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidStateTransition { .. }));
        assert_eq!(err.kind(), ErrorKind::State);

        let err = h.lifecycle.approve(invoice.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        assert_eq!(h.lifecycle.get(invoice.id).await.unwrap(), invoice);
        assert_eq!(h.notifications.get_for_user(UserId::from(agent_id)).await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn test_paid_is_terminal() {
        let h = harness();
        let invoice = h.lifecycle.create(&sale(&h, AgentId::new(), dec!(10000)).await, "Claire").await.unwrap();
        h.lifecycle.submit(invoice.id).await.unwrap();
        h.lifecycle.approve(invoice.id).await.unwrap();
        h.lifecycle.mark_paid(invoice.id).await.unwrap();

        assert!(h.lifecycle.submit(invoice.id).await.is_err());
        assert!(h.lifecycle.mark_paid(invoice.id).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_invoice() {
        let h = harness();
        let err = h.lifecycle.submit(InvoiceId::new()).await.unwrap_err();
        assert!(matches!(err, BillingError::InvoiceNotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submit_succeeds_once() {
        let h = Arc::new(harness());
        let invoice = h.lifecycle.create(&sale(&h, AgentId::new(), dec!(10000)).await, "Claire").await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let h = Arc::clone(&h);
                tokio::spawn(async move { h.lifecycle.submit(invoice.id).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::State),
            }
        }
        assert_eq!(successes, 1);
    }
}

// ============================================================================
// Properties
// ============================================================================

fn status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Submitted),
        Just(InvoiceStatus::Approved),
        Just(InvoiceStatus::Paid),
    ]
}

proptest! {
    #[test]
    fn transitions_only_move_one_step_forward(from in status(), to in status()) {
        let rank = |s: InvoiceStatus| match s {
            InvoiceStatus::Draft => 0,
            InvoiceStatus::Submitted => 1,
            InvoiceStatus::Approved => 2,
            InvoiceStatus::Paid => 3,
        };
        prop_assert_eq!(from.can_transition_to(to), rank(to) == rank(from) + 1);
    }
}

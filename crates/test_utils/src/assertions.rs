//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than a bare `assert_eq!`.

use rust_decimal::Decimal;

use core_kernel::Percentage;
use domain_billing::{InvoiceData, InvoiceStatus};
use domain_commission::{AgentCommission, RevenueBreakdown, RevenueRecord};
use domain_notification::{Notification, NotificationType};

/// Asserts that two decimals differ by at most `tolerance`
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that an agent's aggregate matches its ledger, source by source
pub fn assert_ledger_consistent(commission: &AgentCommission, records: &[RevenueRecord]) {
    let mut expected = RevenueBreakdown::default();
    for record in records {
        assert_eq!(
            record.agent_id, commission.agent_id,
            "Revenue {} belongs to another agent",
            record.id
        );
        expected.add(record.source, record.amount);
    }

    assert_eq!(
        commission.breakdown(),
        expected,
        "Aggregate subtotals disagree with the ledger for agent {}",
        commission.agent_id
    );
    assert_eq!(
        commission.total_amount,
        expected.total(),
        "Aggregate total disagrees with the ledger for agent {}",
        commission.agent_id
    );
}

/// Asserts an agent's current percentage
pub fn assert_percentage(commission: &AgentCommission, expected: Decimal) {
    assert_eq!(
        commission.current_percentage.value(),
        expected,
        "Agent {} is at {}, expected {}%",
        commission.agent_id,
        commission.current_percentage,
        expected
    );
}

/// Counts notifications of one type
pub fn count_notifications(notifications: &[Notification], kind: NotificationType) -> usize {
    notifications.iter().filter(|n| n.notification_type == kind).count()
}

/// Asserts that an invoice kept the rate it was drafted with
pub fn assert_invoice_frozen(invoice: &InvoiceData, rate: Percentage, commission_amount: Decimal) {
    assert_eq!(
        invoice.commission_rate, rate,
        "Invoice {} rate changed to {}",
        invoice.invoice_number, invoice.commission_rate
    );
    assert_eq!(
        invoice.commission_amount, commission_amount,
        "Invoice {} commission changed to {}",
        invoice.invoice_number, invoice.commission_amount
    );
}

pub fn assert_invoice_status(invoice: &InvoiceData, expected: InvoiceStatus) {
    assert_eq!(
        invoice.status, expected,
        "Invoice {} is {}, expected {}",
        invoice.invoice_number, invoice.status, expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_approx_eq_within_tolerance() {
        assert_decimal_approx_eq(dec!(29.9986), dec!(30), dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_decimal_approx_eq_outside_tolerance() {
        assert_decimal_approx_eq(dec!(29.5), dec!(30), dec!(0.01));
    }
}

//! Commission invoices
//!
//! An agent invoices the agency for the commission earned on one revenue
//! record. The commission rate is copied from the agent's aggregate when the
//! invoice is drafted and never changes afterwards, whatever happens to the
//! agent's tier or pack later on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AgentId, InvoiceId, Percentage, RevenueId};
use domain_commission::RevenueRecord;
use crate::error::BillingError;

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being prepared by the agent
    Draft,
    /// Sent to the agency for review
    Submitted,
    /// Accepted by the agency
    Approved,
    /// Commission paid out
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Submitted => "submitted",
            InvoiceStatus::Approved => "approved",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// The only status reachable from this one
    pub fn next(&self) -> Option<InvoiceStatus> {
        match self {
            InvoiceStatus::Draft => Some(InvoiceStatus::Submitted),
            InvoiceStatus::Submitted => Some(InvoiceStatus::Approved),
            InvoiceStatus::Approved => Some(InvoiceStatus::Paid),
            InvoiceStatus::Paid => None,
        }
    }

    pub fn can_transition_to(&self, target: InvoiceStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "submitted" => Ok(InvoiceStatus::Submitted),
            "approved" => Ok(InvoiceStatus::Approved),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(BillingError::validation(format!("unknown invoice status '{}'", other))),
        }
    }
}

/// A commission invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceData {
    pub id: InvoiceId,
    /// Human-readable number, e.g. `FAC-2024-00012`
    pub invoice_number: String,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub revenue_id: RevenueId,
    /// Revenue amount being invoiced
    pub amount: Decimal,
    /// Agent's percentage when the invoice was drafted
    pub commission_rate: Percentage,
    pub commission_amount: Decimal,
    pub status: InvoiceStatus,
    pub property_address: Option<String>,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl InvoiceData {
    /// Drafts an invoice for `record` at `commission_rate`
    pub fn draft(
        record: &RevenueRecord,
        agent_name: impl Into<String>,
        invoice_number: String,
        commission_rate: Percentage,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            invoice_number,
            agent_id: record.agent_id,
            agent_name: agent_name.into(),
            revenue_id: record.id,
            amount: record.amount,
            commission_rate,
            commission_amount: commission_rate.apply(record.amount).round_dp(2),
            status: InvoiceStatus::Draft,
            property_address: record.property_address.clone(),
            client_name: record.client_name.clone(),
            created_at,
            updated_at: created_at,
            paid_at: None,
        }
    }

    /// Moves the invoice to `target`
    ///
    /// # Errors
    ///
    /// `BillingError::InvalidStateTransition` unless `target` is the status
    /// right after the current one. The invoice is left untouched.
    pub fn transition(&mut self, target: InvoiceStatus, at: DateTime<Utc>) -> Result<(), BillingError> {
        if !self.status.can_transition_to(target) {
            return Err(BillingError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.updated_at = at;
        if target == InvoiceStatus::Paid {
            self.paid_at = Some(at);
        }
        Ok(())
    }
}

/// Formats an invoice number from its yearly sequence
pub fn format_invoice_number(prefix: &str, year: i32, sequence: u32) -> String {
    format!("{}-{}-{:05}", prefix, year, sequence)
}

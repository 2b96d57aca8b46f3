//! Invoice lifecycle service
//!
//! `Draft -> Submitted -> Approved -> Paid`, strictly linear. Each step is a
//! compare-and-set on the stored status, so two concurrent calls for the
//! same invoice cannot both succeed.

use chrono::{Datelike, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{AgentId, InvoiceId, PortError, UserId};
use domain_commission::{RevenueLedger, RevenueRecord};
use domain_notification::{NewNotification, NotificationStore, NotificationType};
use crate::error::BillingError;
use crate::invoice::{format_invoice_number, InvoiceData, InvoiceStatus};
use crate::ports::InvoicePort;

/// Default prefix of invoice numbers
pub const DEFAULT_INVOICE_PREFIX: &str = "FAC";

/// Creates invoices and moves them through their workflow
pub struct InvoiceLifecycle {
    port: Arc<dyn InvoicePort>,
    ledger: Arc<RevenueLedger>,
    notifications: NotificationStore,
    prefix: String,
}

impl InvoiceLifecycle {
    pub fn new(
        port: Arc<dyn InvoicePort>,
        ledger: Arc<RevenueLedger>,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            port,
            ledger,
            notifications,
            prefix: DEFAULT_INVOICE_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Drafts an invoice for a revenue record
    ///
    /// The record is re-read from the ledger and the invoice is built from
    /// the stored copy. The agent's current percentage is frozen into the
    /// invoice.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank agent name or an already invoiced revenue
    /// - `Commission(NotFound)` if the record is not in the ledger
    /// - `Commission(AgentNotFound)` if the agent has no commission record
    pub async fn create(&self, record: &RevenueRecord, agent_name: &str) -> Result<InvoiceData, BillingError> {
        let agent_name = agent_name.trim();
        if agent_name.is_empty() {
            return Err(BillingError::validation("agent name must not be blank"));
        }

        let stored = self.ledger.get_revenue(record.id).await?;
        if stored != *record {
            warn!(revenue_id = %record.id, "Invoice requested with a stale revenue record, using the ledger copy");
        }
        let record = &stored;

        if let Some(existing) = self.port.find_by_revenue(record.id).await? {
            return Err(BillingError::validation(format!(
                "revenue {} is already invoiced by {}",
                record.id, existing.invoice_number
            )));
        }

        let commission = self.ledger.get_agent_commission(record.agent_id).await?;

        let now = Utc::now();
        let sequence = self.port.next_sequence(now.year()).await?;
        let invoice = InvoiceData::draft(
            record,
            agent_name,
            format_invoice_number(&self.prefix, now.year(), sequence),
            commission.current_percentage,
            now,
        );
        self.port.insert(&invoice).await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            agent_id = %invoice.agent_id,
            revenue_id = %invoice.revenue_id,
            commission_rate = %invoice.commission_rate,
            commission_amount = %invoice.commission_amount,
            "Invoice drafted"
        );
        Ok(invoice)
    }

    /// Draft to Submitted
    pub async fn submit(&self, id: InvoiceId) -> Result<InvoiceData, BillingError> {
        let invoice = self.advance(id, InvoiceStatus::Submitted).await?;
        self.notify(
            &invoice,
            NotificationType::InvoiceSubmitted,
            "Facture soumise",
            format!("La facture {} a été soumise pour validation.", invoice.invoice_number),
        )
        .await;
        Ok(invoice)
    }

    /// Submitted to Approved
    pub async fn approve(&self, id: InvoiceId) -> Result<InvoiceData, BillingError> {
        let invoice = self.advance(id, InvoiceStatus::Approved).await?;
        self.notify(
            &invoice,
            NotificationType::InvoiceApproved,
            "Facture approuvée",
            format!("La facture {} a été approuvée.", invoice.invoice_number),
        )
        .await;
        Ok(invoice)
    }

    /// Approved to Paid
    pub async fn mark_paid(&self, id: InvoiceId) -> Result<InvoiceData, BillingError> {
        let invoice = self.advance(id, InvoiceStatus::Paid).await?;
        self.notify(
            &invoice,
            NotificationType::InvoicePaid,
            "Facture payée",
            format!(
                "La facture {} a été payée : {} € de commission.",
                invoice.invoice_number, invoice.commission_amount
            ),
        )
        .await;
        Ok(invoice)
    }

    pub async fn get(&self, id: InvoiceId) -> Result<InvoiceData, BillingError> {
        Ok(self.port.get(id).await?)
    }

    /// Invoices of an agent in creation order
    pub async fn list_for_agent(&self, agent_id: AgentId) -> Result<Vec<InvoiceData>, BillingError> {
        Ok(self.port.list_for_agent(agent_id).await?)
    }

    async fn advance(&self, id: InvoiceId, target: InvoiceStatus) -> Result<InvoiceData, BillingError> {
        let current = self.port.get(id).await?;
        let expected = current.status;

        let mut next = current;
        if let Err(e) = next.transition(target, Utc::now()) {
            warn!(invoice_id = %id, from = %expected, to = %target, "Rejected invoice transition");
            return Err(e);
        }

        match self.port.update_if_status(&next, expected).await {
            Ok(()) => {}
            Err(PortError::Conflict { .. }) => {
                let actual = self.port.get(id).await?.status;
                warn!(invoice_id = %id, from = %actual, to = %target, "Invoice changed concurrently");
                return Err(BillingError::InvalidStateTransition {
                    from: actual.to_string(),
                    to: target.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(invoice_id = %id, from = %expected, to = %target, "Invoice status changed");
        Ok(next)
    }

    async fn notify(
        &self,
        invoice: &InvoiceData,
        notification_type: NotificationType,
        title: &str,
        message: String,
    ) {
        let mut data = json!({
            "invoice_id": invoice.id.to_string(),
            "invoice_number": invoice.invoice_number,
            "status": invoice.status,
        });
        if invoice.status == InvoiceStatus::Paid {
            data["commission_amount"] = json!(invoice.commission_amount);
        }

        let request = NewNotification::new(UserId::from(invoice.agent_id), notification_type, title, message)
            .with_data(data);
        self.notifications.emit(request).await;
    }
}

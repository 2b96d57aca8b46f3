//! Billing Domain Ports

use async_trait::async_trait;

use core_kernel::{AgentId, DomainPort, InvoiceId, PortError, RevenueId};
use crate::invoice::{InvoiceData, InvoiceStatus};

/// Persistence operations required by the invoice lifecycle
#[async_trait]
pub trait InvoicePort: DomainPort {
    /// Stores a new invoice
    ///
    /// Fails with `PortError::Validation` if the revenue is already invoiced.
    async fn insert(&self, invoice: &InvoiceData) -> Result<(), PortError>;

    /// Retrieves an invoice by ID, or `PortError::NotFound`
    async fn get(&self, id: InvoiceId) -> Result<InvoiceData, PortError>;

    async fn find_by_revenue(&self, revenue_id: RevenueId) -> Result<Option<InvoiceData>, PortError>;

    /// Invoices of an agent in creation order
    async fn list_for_agent(&self, agent_id: AgentId) -> Result<Vec<InvoiceData>, PortError>;

    /// Replaces the stored invoice if its status is still `expected`
    ///
    /// Fails with `PortError::Conflict` otherwise, leaving the stored
    /// invoice as it was.
    async fn update_if_status(&self, invoice: &InvoiceData, expected: InvoiceStatus) -> Result<(), PortError>;

    /// Next number in the invoice sequence of `year`, starting at 1
    async fn next_sequence(&self, year: i32) -> Result<u32, PortError>;
}

pub mod memory {
    //! In-memory invoice adapter

    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Inner {
        invoices: Vec<InvoiceData>,
        by_id: HashMap<InvoiceId, usize>,
        by_revenue: HashMap<RevenueId, InvoiceId>,
        sequences: HashMap<i32, u32>,
    }

    /// Invoice port backed by process memory
    #[derive(Debug, Default)]
    pub struct InMemoryInvoicePort {
        inner: RwLock<Inner>,
    }

    impl InMemoryInvoicePort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryInvoicePort {}

    #[async_trait]
    impl InvoicePort for InMemoryInvoicePort {
        async fn insert(&self, invoice: &InvoiceData) -> Result<(), PortError> {
            let mut inner = self.inner.write().await;
            if inner.by_id.contains_key(&invoice.id) {
                return Err(PortError::conflict(format!("invoice {} already stored", invoice.id)));
            }
            if let Some(existing) = inner.by_revenue.get(&invoice.revenue_id) {
                return Err(PortError::validation(format!(
                    "revenue {} is already invoiced by {}",
                    invoice.revenue_id, existing
                )));
            }

            let index = inner.invoices.len();
            inner.invoices.push(invoice.clone());
            inner.by_id.insert(invoice.id, index);
            inner.by_revenue.insert(invoice.revenue_id, invoice.id);
            Ok(())
        }

        async fn get(&self, id: InvoiceId) -> Result<InvoiceData, PortError> {
            let inner = self.inner.read().await;
            inner
                .by_id
                .get(&id)
                .and_then(|&index| inner.invoices.get(index))
                .cloned()
                .ok_or_else(|| PortError::not_found("Invoice", id))
        }

        async fn find_by_revenue(&self, revenue_id: RevenueId) -> Result<Option<InvoiceData>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner
                .by_revenue
                .get(&revenue_id)
                .and_then(|id| inner.by_id.get(id))
                .and_then(|&index| inner.invoices.get(index))
                .cloned())
        }

        async fn list_for_agent(&self, agent_id: AgentId) -> Result<Vec<InvoiceData>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner
                .invoices
                .iter()
                .filter(|invoice| invoice.agent_id == agent_id)
                .cloned()
                .collect())
        }

        async fn update_if_status(&self, invoice: &InvoiceData, expected: InvoiceStatus) -> Result<(), PortError> {
            let mut inner = self.inner.write().await;
            let index = *inner
                .by_id
                .get(&invoice.id)
                .ok_or_else(|| PortError::not_found("Invoice", invoice.id))?;

            let stored = inner
                .invoices
                .get_mut(index)
                .ok_or_else(|| PortError::internal(format!("invoice index {} out of bounds", index)))?;
            if stored.status != expected {
                return Err(PortError::conflict(format!(
                    "invoice {} is {}, expected {}",
                    invoice.id, stored.status, expected
                )));
            }
            *stored = invoice.clone();
            Ok(())
        }

        async fn next_sequence(&self, year: i32) -> Result<u32, PortError> {
            let mut inner = self.inner.write().await;
            let sequence = inner.sequences.entry(year).or_insert(0);
            *sequence += 1;
            Ok(*sequence)
        }
    }
}

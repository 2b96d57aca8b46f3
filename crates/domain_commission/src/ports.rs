//! Commission Domain Ports
//!
//! `CommissionLedgerPort` stores revenue records and agent commission
//! aggregates together so that a revenue append and the aggregate update it
//! causes are committed as one unit.

use async_trait::async_trait;

use core_kernel::{AgentId, DomainPort, PortError, RevenueId};
use crate::agent_commission::AgentCommission;
use crate::revenue::RevenueRecord;

/// Persistence operations required by the revenue ledger
#[async_trait]
pub trait CommissionLedgerPort: DomainPort {
    /// Current commission record of an agent, if any
    async fn get_commission(&self, agent_id: AgentId) -> Result<Option<AgentCommission>, PortError>;

    /// Appends `record` and stores `commission` as the agent's current state
    ///
    /// Either both writes happen or neither does.
    async fn commit_revenue(
        &self,
        record: &RevenueRecord,
        commission: &AgentCommission,
    ) -> Result<(), PortError>;

    /// Revenue records of an agent in insertion order
    async fn list_revenues(&self, agent_id: AgentId) -> Result<Vec<RevenueRecord>, PortError>;

    /// Retrieves a revenue record by ID, or `PortError::NotFound`
    async fn get_revenue(&self, id: RevenueId) -> Result<RevenueRecord, PortError>;

    /// Stores `current` as the agent's commission state
    ///
    /// When `superseded` is given it is archived in the agent's history in
    /// the same write.
    async fn replace_commission(
        &self,
        superseded: Option<&AgentCommission>,
        current: &AgentCommission,
    ) -> Result<(), PortError>;

    /// Superseded windows of an agent, oldest first
    async fn superseded_commissions(&self, agent_id: AgentId) -> Result<Vec<AgentCommission>, PortError>;
}

pub mod memory {
    //! In-memory ledger adapter

    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Inner {
        commissions: HashMap<AgentId, AgentCommission>,
        history: HashMap<AgentId, Vec<AgentCommission>>,
        revenues: HashMap<AgentId, Vec<RevenueRecord>>,
        revenue_owners: HashMap<RevenueId, AgentId>,
    }

    /// Ledger port backed by process memory
    ///
    /// A single write lock covers every map, which makes each port call
    /// atomic.
    #[derive(Debug, Default)]
    pub struct InMemoryCommissionLedgerPort {
        inner: RwLock<Inner>,
    }

    impl InMemoryCommissionLedgerPort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryCommissionLedgerPort {}

    #[async_trait]
    impl CommissionLedgerPort for InMemoryCommissionLedgerPort {
        async fn get_commission(&self, agent_id: AgentId) -> Result<Option<AgentCommission>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner.commissions.get(&agent_id).cloned())
        }

        async fn commit_revenue(
            &self,
            record: &RevenueRecord,
            commission: &AgentCommission,
        ) -> Result<(), PortError> {
            if record.agent_id != commission.agent_id {
                return Err(PortError::validation(format!(
                    "revenue {} belongs to {}, not {}",
                    record.id, record.agent_id, commission.agent_id
                )));
            }

            let mut inner = self.inner.write().await;
            if inner.revenue_owners.contains_key(&record.id) {
                return Err(PortError::conflict(format!("revenue {} already recorded", record.id)));
            }

            inner.revenue_owners.insert(record.id, record.agent_id);
            inner
                .revenues
                .entry(record.agent_id)
                .or_default()
                .push(record.clone());
            inner.commissions.insert(commission.agent_id, commission.clone());
            Ok(())
        }

        async fn list_revenues(&self, agent_id: AgentId) -> Result<Vec<RevenueRecord>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner.revenues.get(&agent_id).cloned().unwrap_or_default())
        }

        async fn get_revenue(&self, id: RevenueId) -> Result<RevenueRecord, PortError> {
            let inner = self.inner.read().await;
            inner
                .revenue_owners
                .get(&id)
                .and_then(|owner| inner.revenues.get(owner))
                .and_then(|records| records.iter().find(|r| r.id == id))
                .cloned()
                .ok_or_else(|| PortError::not_found("Revenue", id))
        }

        async fn replace_commission(
            &self,
            superseded: Option<&AgentCommission>,
            current: &AgentCommission,
        ) -> Result<(), PortError> {
            let mut inner = self.inner.write().await;
            if let Some(previous) = superseded {
                inner
                    .history
                    .entry(previous.agent_id)
                    .or_default()
                    .push(previous.clone());
            }
            inner.commissions.insert(current.agent_id, current.clone());
            Ok(())
        }

        async fn superseded_commissions(&self, agent_id: AgentId) -> Result<Vec<AgentCommission>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner.history.get(&agent_id).cloned().unwrap_or_default())
        }
    }

}

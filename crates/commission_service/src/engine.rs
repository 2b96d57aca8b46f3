//! Commission engine facade
//!
//! Wires the pack catalog, the revenue ledger, the notification store and
//! the invoice lifecycle together, and exposes the operations used by the
//! dashboard, invoice and notification screens of the intranet.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use core_kernel::{AgentId, InvoiceId, NotificationId, PackId, Percentage, RevenueId, UserId};
use domain_billing::{InMemoryInvoicePort, InvoiceData, InvoiceLifecycle, InvoicePort};
use domain_commission::{
    AgentCommission, CommissionCalculator, CommissionError, CommissionLedgerPort, CommissionPack,
    CommissionRange, InMemoryCommissionLedgerPort, NewRevenue, PackCatalog, RevenueBreakdown,
    RevenueLedger, RevenueRecord, Simulation, TierProgress,
};
use domain_notification::{InMemoryNotificationPort, Notification, NotificationPort, NotificationStore};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Persistence ports used by the engine
pub struct EnginePorts {
    pub ledger: Arc<dyn CommissionLedgerPort>,
    pub notifications: Arc<dyn NotificationPort>,
    pub invoices: Arc<dyn InvoicePort>,
}

impl EnginePorts {
    /// Process-local ports
    pub fn in_memory() -> Self {
        Self {
            ledger: Arc::new(InMemoryCommissionLedgerPort::new()),
            notifications: Arc::new(InMemoryNotificationPort::new()),
            invoices: Arc::new(InMemoryInvoicePort::new()),
        }
    }
}

/// The commission engine
pub struct CommissionEngine {
    calculator: CommissionCalculator,
    ledger: Arc<RevenueLedger>,
    notifications: NotificationStore,
    invoices: InvoiceLifecycle,
}

impl CommissionEngine {
    /// Builds an engine over the given ports
    ///
    /// # Errors
    ///
    /// `Configuration` if the configured default pack is not in the catalog.
    pub fn new(catalog: PackCatalog, ports: EnginePorts, config: &EngineConfig) -> Result<Self, EngineError> {
        let catalog = Arc::new(catalog);
        let calculator = CommissionCalculator::new(Arc::clone(&catalog));
        let notifications = NotificationStore::new(ports.notifications);

        let mut ledger = RevenueLedger::new(ports.ledger, calculator.clone(), notifications.clone());
        if let Some(pack_id) = config.default_pack() {
            if !catalog.contains(&pack_id) {
                return Err(CommissionError::configuration(format!(
                    "default pack {} is not in the catalog",
                    pack_id
                ))
                .into());
            }
            ledger = ledger.with_default_pack(pack_id);
        }
        let ledger = Arc::new(ledger);

        let invoices = InvoiceLifecycle::new(ports.invoices, Arc::clone(&ledger), notifications.clone())
            .with_prefix(config.invoice_prefix.clone());

        info!(
            packs = catalog.len(),
            default_pack = ?config.default_pack_id,
            "Commission engine ready"
        );

        Ok(Self {
            calculator,
            ledger,
            notifications,
            invoices,
        })
    }

    /// Engine with in-memory ports
    pub fn in_memory(catalog: PackCatalog, config: &EngineConfig) -> Result<Self, EngineError> {
        Self::new(catalog, EnginePorts::in_memory(), config)
    }

    /// Engine with in-memory ports and the pack file named in `config`
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let catalog = config.load_catalog()?;
        Self::in_memory(catalog, config)
    }

    // ------------------------------------------------------------------
    // Packs
    // ------------------------------------------------------------------

    pub fn packs(&self) -> Vec<&CommissionPack> {
        self.calculator.catalog().get_all()
    }

    pub fn active_packs(&self) -> Vec<&CommissionPack> {
        self.calculator.catalog().get_active()
    }

    pub fn pack(&self, pack_id: &PackId) -> Result<&CommissionPack, EngineError> {
        Ok(self.calculator.catalog().get_by_id(pack_id)?)
    }

    pub fn tier_table(&self, pack_id: &PackId) -> Result<Vec<CommissionRange>, EngineError> {
        Ok(self.calculator.tier_table(pack_id)?)
    }

    // ------------------------------------------------------------------
    // Calculator
    // ------------------------------------------------------------------

    pub fn percentage_for(&self, amount: Decimal, pack_id: &PackId) -> Result<Percentage, EngineError> {
        Ok(self.calculator.percentage_for(amount, pack_id)?)
    }

    pub fn commission_for(&self, amount: Decimal, pack_id: &PackId) -> Result<Decimal, EngineError> {
        Ok(self.calculator.commission_for(amount, pack_id)?)
    }

    pub fn simulate(
        &self,
        base_amount: Decimal,
        additional_amount: Decimal,
        current_percentage: Percentage,
        pack_id: &PackId,
    ) -> Result<Simulation, EngineError> {
        Ok(self
            .calculator
            .simulate(base_amount, additional_amount, current_percentage, pack_id)?)
    }

    pub fn progress_to_next_tier(&self, total_amount: Decimal, pack_id: &PackId) -> Result<TierProgress, EngineError> {
        Ok(self.calculator.progress_to_next_tier(total_amount, pack_id)?)
    }

    /// Simulation from the agent's own totals and percentage
    pub async fn simulate_for_agent(
        &self,
        agent_id: AgentId,
        additional_amount: Decimal,
    ) -> Result<Simulation, EngineError> {
        let commission = self.ledger.get_agent_commission(agent_id).await?;
        self.simulate(
            commission.total_amount,
            additional_amount,
            commission.current_percentage,
            &commission.pack_id,
        )
    }

    /// Tier progress of the agent's current totals
    pub async fn progress_for_agent(&self, agent_id: AgentId) -> Result<TierProgress, EngineError> {
        let commission = self.ledger.get_agent_commission(agent_id).await?;
        self.progress_to_next_tier(commission.total_amount, &commission.pack_id)
    }

    // ------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------

    pub async fn add_revenue(&self, request: NewRevenue) -> Result<RevenueRecord, EngineError> {
        Ok(self.ledger.add_revenue(request).await?)
    }

    pub async fn get_agent_revenues(&self, agent_id: AgentId) -> Result<Vec<RevenueRecord>, EngineError> {
        Ok(self.ledger.get_agent_revenues(agent_id).await?)
    }

    pub async fn get_revenue(&self, id: RevenueId) -> Result<RevenueRecord, EngineError> {
        Ok(self.ledger.get_revenue(id).await?)
    }

    pub async fn get_agent_commission(&self, agent_id: AgentId) -> Result<AgentCommission, EngineError> {
        Ok(self.ledger.get_agent_commission(agent_id).await?)
    }

    /// Puts an agent on a pack from today
    pub async fn assign_pack(&self, agent_id: AgentId, pack_id: PackId) -> Result<AgentCommission, EngineError> {
        Ok(self
            .ledger
            .assign_pack(agent_id, pack_id, Utc::now().date_naive())
            .await?)
    }

    pub async fn commission_history(&self, agent_id: AgentId) -> Result<Vec<AgentCommission>, EngineError> {
        Ok(self.ledger.commission_history(agent_id).await?)
    }

    pub async fn recompute_totals(&self, agent_id: AgentId) -> Result<RevenueBreakdown, EngineError> {
        Ok(self.ledger.recompute_totals(agent_id).await?)
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    /// Drafts an invoice for a recorded revenue
    pub async fn create_invoice(&self, revenue_id: RevenueId, agent_name: &str) -> Result<InvoiceData, EngineError> {
        let record = self.ledger.get_revenue(revenue_id).await?;
        Ok(self.invoices.create(&record, agent_name).await?)
    }

    pub async fn submit_invoice(&self, id: InvoiceId) -> Result<InvoiceData, EngineError> {
        Ok(self.invoices.submit(id).await?)
    }

    pub async fn approve_invoice(&self, id: InvoiceId) -> Result<InvoiceData, EngineError> {
        Ok(self.invoices.approve(id).await?)
    }

    pub async fn mark_invoice_paid(&self, id: InvoiceId) -> Result<InvoiceData, EngineError> {
        Ok(self.invoices.mark_paid(id).await?)
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceData, EngineError> {
        Ok(self.invoices.get(id).await?)
    }

    pub async fn invoices_for_agent(&self, agent_id: AgentId) -> Result<Vec<InvoiceData>, EngineError> {
        Ok(self.invoices.list_for_agent(agent_id).await?)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn notifications_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, EngineError> {
        Ok(self.notifications.get_for_user(user_id).await?)
    }

    pub async fn unread_notifications(&self, user_id: UserId) -> Result<Vec<Notification>, EngineError> {
        Ok(self.notifications.get_unread_for_user(user_id).await?)
    }

    pub async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification, EngineError> {
        Ok(self.notifications.mark_read(id).await?)
    }

    pub async fn mark_all_notifications_read(&self, user_id: UserId) -> Result<usize, EngineError> {
        Ok(self.notifications.mark_all_read(user_id).await?)
    }

    pub async fn unread_count(&self, user_id: UserId) -> Result<usize, EngineError> {
        Ok(self.notifications.unread_count(user_id).await?)
    }
}

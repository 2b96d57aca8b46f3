//! Revenue ledger service
//!
//! Records revenue events, keeps each agent's commission aggregate in step
//! with the ledger, and raises the notifications a revenue event implies.
//!
//! # Flow of `add_revenue`
//!
//! 1. Validate the request
//! 2. Take the agent's lock
//! 3. Load (or open) the aggregate and credit the amount
//! 4. Recompute the percentage from the pack
//! 5. Commit record and aggregate in one port call
//! 6. Notify: tier crossing, then `Compromis` for a sale
//!
//! Steps 1 to 4 are pure; a failure there leaves the ledger, the aggregate
//! and the notification store untouched.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use core_kernel::{AgentId, PackId, RevenueId, UserId};
use domain_notification::{NewNotification, NotificationStore, NotificationType};
use crate::agent_commission::{AgentCommission, RevenueBreakdown};
use crate::calculator::CommissionCalculator;
use crate::error::CommissionError;
use crate::ports::CommissionLedgerPort;
use crate::revenue::{NewRevenue, RevenueRecord, RevenueSource};
use crate::threshold::ThresholdNotifier;

/// Revenue ledger and agent commission aggregates
pub struct RevenueLedger {
    port: Arc<dyn CommissionLedgerPort>,
    calculator: CommissionCalculator,
    notifier: ThresholdNotifier,
    notifications: NotificationStore,
    default_pack: Option<PackId>,
    agent_locks: Mutex<HashMap<AgentId, Arc<Mutex<()>>>>,
}

impl RevenueLedger {
    pub fn new(
        port: Arc<dyn CommissionLedgerPort>,
        calculator: CommissionCalculator,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            port,
            calculator,
            notifier: ThresholdNotifier::new(notifications.clone()),
            notifications,
            default_pack: None,
            agent_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Pack given to agents whose first event is a revenue
    ///
    /// Without a default pack such an agent is refused with `AgentNotFound`.
    pub fn with_default_pack(mut self, pack_id: PackId) -> Self {
        self.default_pack = Some(pack_id);
        self
    }

    pub fn calculator(&self) -> &CommissionCalculator {
        &self.calculator
    }

    /// Records a revenue event and updates the agent's aggregate
    pub async fn add_revenue(&self, request: NewRevenue) -> Result<RevenueRecord, CommissionError> {
        request.validate()?;

        let agent_id = request.agent_id;
        let _guard = self.lock_agent(agent_id).await;

        let current = match self.port.get_commission(agent_id).await? {
            Some(current) => current,
            None => self.open_with_default_pack(agent_id, request.date)?,
        };
        let old_percentage = current.current_percentage;

        let mut next = current.credited(request.source, request.amount);
        next.current_percentage = self.calculator.percentage_for(next.total_amount, &next.pack_id)?;
        next.updated_at = Utc::now();

        let record = RevenueRecord::from_request(request, next.updated_at);
        self.port.commit_revenue(&record, &next).await?;

        info!(
            agent_id = %agent_id,
            revenue_id = %record.id,
            source = %record.source,
            amount = %record.amount,
            total = %next.total_amount,
            percentage = %next.current_percentage,
            "Revenue recorded"
        );

        let user_id = UserId::from(agent_id);
        self.notifier
            .check_threshold(user_id, old_percentage, next.current_percentage)
            .await;

        if record.source == RevenueSource::Sale {
            self.notify_compromis(user_id, &record).await;
        }

        Ok(record)
    }

    /// Revenue records of an agent in insertion order
    pub async fn get_agent_revenues(&self, agent_id: AgentId) -> Result<Vec<RevenueRecord>, CommissionError> {
        Ok(self.port.list_revenues(agent_id).await?)
    }

    pub async fn get_revenue(&self, id: RevenueId) -> Result<RevenueRecord, CommissionError> {
        Ok(self.port.get_revenue(id).await?)
    }

    /// Current commission state of an agent
    pub async fn get_agent_commission(&self, agent_id: AgentId) -> Result<AgentCommission, CommissionError> {
        self.port
            .get_commission(agent_id)
            .await?
            .ok_or_else(|| CommissionError::AgentNotFound(agent_id.to_string()))
    }

    /// Puts an agent on `pack_id` from `start_date`
    ///
    /// The running window is closed and a new one opened on the new pack
    /// with the same totals. An agent without a record gets a fresh one.
    /// Reassigning to the current pack changes nothing.
    pub async fn assign_pack(
        &self,
        agent_id: AgentId,
        pack_id: PackId,
        start_date: NaiveDate,
    ) -> Result<AgentCommission, CommissionError> {
        self.calculator.catalog().get_by_id(&pack_id)?;

        let _guard = self.lock_agent(agent_id).await;

        let current = match self.port.get_commission(agent_id).await? {
            Some(current) => current,
            None => {
                let opened = self.open(agent_id, pack_id, start_date)?;
                self.port.replace_commission(None, &opened).await?;
                info!(agent_id = %agent_id, pack_id = %opened.pack_id, "Pack assigned");
                return Ok(opened);
            }
        };

        if current.pack_id == pack_id {
            debug!(agent_id = %agent_id, pack_id = %pack_id, "Agent already on pack");
            return Ok(current);
        }

        let percentage = self.calculator.percentage_for(current.total_amount, &pack_id)?;

        let mut closed = current.clone();
        closed.valid_period.close_on(start_date)?;
        closed.updated_at = Utc::now();

        let next_start = closed.valid_period.end_date.unwrap_or(start_date);
        let next = current.reassigned(pack_id, percentage, next_start);
        self.port.replace_commission(Some(&closed), &next).await?;

        info!(
            agent_id = %agent_id,
            from_pack = %current.pack_id,
            to_pack = %next.pack_id,
            percentage = %next.current_percentage,
            "Pack reassigned"
        );

        self.notifier
            .check_threshold(UserId::from(agent_id), current.current_percentage, next.current_percentage)
            .await;

        Ok(next)
    }

    /// Superseded windows followed by the current one, oldest first
    pub async fn commission_history(&self, agent_id: AgentId) -> Result<Vec<AgentCommission>, CommissionError> {
        let mut history = self.port.superseded_commissions(agent_id).await?;
        match self.port.get_commission(agent_id).await? {
            Some(current) => history.push(current),
            None if history.is_empty() => {
                return Err(CommissionError::AgentNotFound(agent_id.to_string()));
            }
            None => {}
        }
        Ok(history)
    }

    /// Sums the agent's ledger per source
    ///
    /// Logs a warning if the stored aggregate disagrees with the ledger.
    pub async fn recompute_totals(&self, agent_id: AgentId) -> Result<RevenueBreakdown, CommissionError> {
        let records = self.port.list_revenues(agent_id).await?;
        let mut breakdown = RevenueBreakdown::default();
        for record in &records {
            breakdown.add(record.source, record.amount);
        }

        if let Some(current) = self.port.get_commission(agent_id).await? {
            if current.breakdown() != breakdown || !current.is_consistent() {
                warn!(
                    agent_id = %agent_id,
                    stored_total = %current.total_amount,
                    ledger_total = %breakdown.total(),
                    "Commission aggregate out of step with ledger"
                );
            }
        }

        Ok(breakdown)
    }

    /// Takes the agent's lock
    ///
    /// Entries nobody holds or waits on (strong count 1) are pruned first, so
    /// the map only tracks agents with calls in flight.
    async fn lock_agent(&self, agent_id: AgentId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.agent_locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(agent_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    fn open_with_default_pack(
        &self,
        agent_id: AgentId,
        start_date: NaiveDate,
    ) -> Result<AgentCommission, CommissionError> {
        let pack_id = self
            .default_pack
            .clone()
            .ok_or_else(|| CommissionError::AgentNotFound(agent_id.to_string()))?;
        debug!(agent_id = %agent_id, pack_id = %pack_id, "Opening commission record on default pack");
        self.open(agent_id, pack_id, start_date)
    }

    fn open(
        &self,
        agent_id: AgentId,
        pack_id: PackId,
        start_date: NaiveDate,
    ) -> Result<AgentCommission, CommissionError> {
        let percentage = self.calculator.percentage_for(rust_decimal::Decimal::ZERO, &pack_id)?;
        Ok(AgentCommission::new(agent_id, pack_id, percentage, start_date))
    }

    async fn notify_compromis(&self, user_id: UserId, record: &RevenueRecord) {
        let location = record.property_address.as_deref().unwrap_or("un bien");
        let request = NewNotification::new(
            user_id,
            NotificationType::Compromis,
            "Nouveau compromis",
            format!("Un compromis a été enregistré pour {} ({}).", location, record.amount),
        )
        .with_data(json!({
            "revenue_id": record.id.to_string(),
            "amount": record.amount,
            "property_address": record.property_address,
            "client_name": record.client_name,
        }));

        self.notifications.emit(request).await;
    }
}

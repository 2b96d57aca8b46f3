//! Revenue records
//!
//! Every fee an agent brings in (a sale, a rental, a property management
//! mandate) is recorded once in the agent's ledger and never modified.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AgentId, RevenueId};
use crate::error::CommissionError;

/// Business line a revenue comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueSource {
    Sale,
    Rental,
    PropertyManagement,
}

impl RevenueSource {
    pub const ALL: [RevenueSource; 3] = [
        RevenueSource::Sale,
        RevenueSource::Rental,
        RevenueSource::PropertyManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueSource::Sale => "sale",
            RevenueSource::Rental => "rental",
            RevenueSource::PropertyManagement => "property_management",
        }
    }
}

impl fmt::Display for RevenueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevenueSource {
    type Err = CommissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(RevenueSource::Sale),
            "rental" => Ok(RevenueSource::Rental),
            "property_management" => Ok(RevenueSource::PropertyManagement),
            other => Err(CommissionError::validation(format!(
                "unknown revenue source '{}'",
                other
            ))),
        }
    }
}

/// A revenue event submitted to the ledger, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRevenue {
    pub agent_id: AgentId,
    pub source: RevenueSource,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub property_address: Option<String>,
    pub client_name: Option<String>,
}

impl NewRevenue {
    pub fn new(agent_id: AgentId, source: RevenueSource, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            agent_id,
            source,
            amount,
            date,
            property_address: None,
            client_name: None,
        }
    }

    pub fn with_property_address(mut self, address: impl Into<String>) -> Self {
        self.property_address = Some(address.into());
        self
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Rejects negative amounts
    pub fn validate(&self) -> Result<(), CommissionError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(CommissionError::validation(format!(
                "revenue amount must not be negative, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A revenue entry in an agent's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub id: RevenueId,
    pub agent_id: AgentId,
    pub source: RevenueSource,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub property_address: Option<String>,
    pub client_name: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl RevenueRecord {
    /// Assigns a fresh ledger id to a validated request
    pub fn from_request(request: NewRevenue, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: RevenueId::new_v7(),
            agent_id: request.agent_id,
            source: request.source,
            amount: request.amount,
            date: request.date,
            property_address: request.property_address,
            client_name: request.client_name,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    #[test]
    fn test_source_parsing() {
        for source in RevenueSource::ALL {
            assert_eq!(source.as_str().parse::<RevenueSource>().unwrap(), source);
        }
        let err = "commission".parse::<RevenueSource>().unwrap_err();
        assert!(matches!(err, CommissionError::Validation(_)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let request = NewRevenue::new(AgentId::new(), RevenueSource::Rental, dec!(-0.01), today());
        assert!(request.validate().is_err());

        let zero = NewRevenue::new(AgentId::new(), RevenueSource::Rental, dec!(0), today());
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_from_request_keeps_details() {
        let request = NewRevenue::new(AgentId::new(), RevenueSource::Sale, dec!(12000), today())
            .with_property_address("12 rue des Lilas, Lyon")
            .with_client_name("M. Durand");

        let record = RevenueRecord::from_request(request.clone(), Utc::now());

        assert_eq!(record.agent_id, request.agent_id);
        assert_eq!(record.amount, dec!(12000));
        assert_eq!(record.property_address.as_deref(), Some("12 rue des Lilas, Lyon"));
        assert_eq!(record.client_name.as_deref(), Some("M. Durand"));
    }
}

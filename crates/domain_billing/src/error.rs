//! Billing domain errors

use thiserror::Error;

use core_kernel::{ErrorKind, PortError};
use domain_commission::CommissionError;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Invoice not found
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Invoice input rejected before any mutation
    #[error("Invalid invoice: {0}")]
    Validation(String),

    /// Transition attempted from the wrong status
    #[error("Invalid invoice status transition from {from} to {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    /// Failure reading the agent's commission state
    #[error(transparent)]
    Commission(#[from] CommissionError),

    #[error("Invoice storage error: {0}")]
    Storage(PortError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::InvoiceNotFound(_) => ErrorKind::NotFound,
            BillingError::Validation(_) => ErrorKind::Validation,
            BillingError::InvalidStateTransition { .. } => ErrorKind::State,
            BillingError::Commission(e) => e.kind(),
            BillingError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                BillingError::InvoiceNotFound(format!("{} {}", entity_type, id))
            }
            PortError::Validation { message } => BillingError::Validation(message),
            other => BillingError::Storage(other),
        }
    }
}

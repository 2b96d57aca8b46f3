//! Commission domain errors

use thiserror::Error;

use core_kernel::{ErrorKind, PortError, TemporalError};

/// Errors that can occur in the commission domain
#[derive(Debug, Error)]
pub enum CommissionError {
    /// Pack id unknown to the catalog
    #[error("Pack not found: {0}")]
    PackNotFound(String),

    /// Agent has no commission record yet
    #[error("No commission record for agent {0}")]
    AgentNotFound(String),

    /// Any other missing record reported by the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any mutation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Pack ranges are malformed or do not cover the queried amount
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Commission storage error: {0}")]
    Storage(PortError),
}

impl CommissionError {
    pub fn validation(message: impl Into<String>) -> Self {
        CommissionError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CommissionError::Configuration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommissionError::PackNotFound(_)
            | CommissionError::AgentNotFound(_)
            | CommissionError::NotFound(_) => ErrorKind::NotFound,
            CommissionError::Validation(_) => ErrorKind::Validation,
            CommissionError::Configuration(_) => ErrorKind::Configuration,
            CommissionError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<PortError> for CommissionError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                CommissionError::NotFound(format!("{} {}", entity_type, id))
            }
            PortError::Validation { message } => CommissionError::Validation(message),
            other => CommissionError::Storage(other),
        }
    }
}

impl From<TemporalError> for CommissionError {
    fn from(err: TemporalError) -> Self {
        CommissionError::Validation(err.to_string())
    }
}

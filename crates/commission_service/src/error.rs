//! Engine errors

use std::path::PathBuf;
use thiserror::Error;

use core_kernel::{CoreError, ErrorKind};
use domain_billing::BillingError;
use domain_commission::CommissionError;
use domain_notification::NotificationError;

/// Errors surfaced by the commission engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cannot read pack file {path}: {source}")]
    PackFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Commission(#[from] CommissionError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Config(_) | EngineError::PackFile { .. } => ErrorKind::Configuration,
            EngineError::Commission(e) => e.kind(),
            EngineError::Billing(e) => e.kind(),
            EngineError::Notification(e) => e.kind(),
        }
    }
}

/// Flattens an engine error into the shared taxonomy, for callers that only
/// branch on the kind
impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        CoreError::of_kind(err.kind(), err.to_string())
    }
}

//! Core error types used across the system

use thiserror::Error;

/// Broad classification shared by every domain error
///
/// Callers (dashboards, invoice screens) branch on the kind rather than on
/// the concrete domain variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced agent, pack, revenue, invoice or notification does not exist
    NotFound,
    /// Input was rejected before any mutation happened
    Validation,
    /// Pack data has a gap, overlap or is otherwise malformed
    Configuration,
    /// An invoice transition was attempted from the wrong status
    State,
    /// The backing store failed
    Storage,
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Builds the error of the given kind carrying `message`
    pub fn of_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => CoreError::NotFound(message),
            ErrorKind::Validation => CoreError::Validation(message),
            ErrorKind::Configuration => CoreError::Configuration(message),
            ErrorKind::State => CoreError::InvalidStateTransition(message),
            ErrorKind::Storage => CoreError::Storage(message),
        }
    }

    /// Returns the taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::InvalidStateTransition(_) => ErrorKind::State,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Configuration(_) => ErrorKind::Configuration,
            CoreError::Storage(_) => ErrorKind::Storage,
        }
    }
}

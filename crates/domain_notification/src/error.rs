//! Notification domain errors

use thiserror::Error;

use core_kernel::{ErrorKind, PortError};

/// Errors that can occur in the notification domain
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Invalid notification: {0}")]
    Validation(String),

    #[error("Notification storage error: {0}")]
    Storage(PortError),
}

impl NotificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::NotFound(_) => ErrorKind::NotFound,
            NotificationError::Validation(_) => ErrorKind::Validation,
            NotificationError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<PortError> for NotificationError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                NotificationError::NotFound(format!("{} {}", entity_type, id))
            }
            PortError::Validation { message } => NotificationError::Validation(message),
            other => NotificationError::Storage(other),
        }
    }
}

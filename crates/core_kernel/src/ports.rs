//! Persistence ports
//!
//! Every domain crate declares its own repository trait (a "port") and ships
//! an in-memory adapter. Production deployments supply a transactional store
//! implementing the same trait.
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait NotificationPort: DomainPort {
//!     async fn insert(&self, notification: &Notification) -> Result<(), PortError>;
//! }
//!
//! let store = NotificationStore::new(Arc::new(InMemoryNotificationPort::new()));
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// All adapters use this type so that domain services handle a missing
/// record the same way whatever the backing store is.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The store rejected the data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// The write conflicts with the stored state (e.g. status changed concurrently)
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying store failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared behind `Arc<dyn ...>` across tasks.
pub trait DomainPort: Send + Sync + 'static {}

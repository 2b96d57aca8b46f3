//! Notification Domain
//!
//! Notifications are created as side effects of other domains (a sale is
//! registered, an agent reaches a higher commission tier, an invoice moves
//! forward) and shown in the intranet notification centre.
//!
//! The only permitted mutation is flipping a notification to read, one at a
//! time or in bulk for a user. Notifications are never deleted.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_notification::{NotificationStore, NewNotification, NotificationType};
//! use domain_notification::ports::memory::InMemoryNotificationPort;
//!
//! let store = NotificationStore::new(Arc::new(InMemoryNotificationPort::new()));
//! store.create(NewNotification::new(
//!     user_id,
//!     NotificationType::Compromis,
//!     "Nouveau compromis",
//!     "A sale was registered",
//! )).await?;
//! assert_eq!(store.unread_count(user_id).await?, 1);
//! ```

pub mod notification;
pub mod ports;
pub mod store;
pub mod error;

pub use notification::{Notification, NewNotification, NotificationType};
pub use ports::NotificationPort;
pub use ports::memory::InMemoryNotificationPort;
pub use store::NotificationStore;
pub use error::NotificationError;

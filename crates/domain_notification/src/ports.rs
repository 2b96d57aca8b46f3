//! Notification Domain Ports
//!
//! `NotificationPort` is the persistence boundary of the notification store.
//! The in-memory adapter in [`memory`] backs tests and single-process
//! deployments.

use async_trait::async_trait;

use core_kernel::{DomainPort, NotificationId, PortError, UserId};
use crate::notification::Notification;

/// Persistence operations required by the notification store
#[async_trait]
pub trait NotificationPort: DomainPort {
    /// Stores a new notification
    async fn insert(&self, notification: &Notification) -> Result<(), PortError>;

    /// Retrieves a notification by ID, or `PortError::NotFound`
    async fn get(&self, id: NotificationId) -> Result<Notification, PortError>;

    /// Lists a user's notifications in insertion order
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, PortError>;

    /// Flips one notification to read and returns it
    async fn mark_read(&self, id: NotificationId) -> Result<Notification, PortError>;

    /// Flips every notification of a user to read
    ///
    /// Returns the number of notifications that were unread, or
    /// `PortError::NotFound` if the user has no notifications at all.
    async fn mark_all_read(&self, user_id: UserId) -> Result<usize, PortError>;
}

pub mod memory {
    //! In-memory notification adapter

    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Inner {
        by_user: HashMap<UserId, Vec<Notification>>,
        owners: HashMap<NotificationId, UserId>,
    }

    impl Inner {
        fn find_mut(&mut self, id: NotificationId) -> Option<&mut Notification> {
            let owner = *self.owners.get(&id)?;
            self.by_user
                .get_mut(&owner)?
                .iter_mut()
                .find(|n| n.id == id)
        }
    }

    /// Notification port backed by process memory
    #[derive(Debug, Default)]
    pub struct InMemoryNotificationPort {
        inner: RwLock<Inner>,
    }

    impl InMemoryNotificationPort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryNotificationPort {}

    #[async_trait]
    impl NotificationPort for InMemoryNotificationPort {
        async fn insert(&self, notification: &Notification) -> Result<(), PortError> {
            let mut inner = self.inner.write().await;
            if inner.owners.contains_key(&notification.id) {
                return Err(PortError::conflict(format!(
                    "notification {} already stored",
                    notification.id
                )));
            }
            inner.owners.insert(notification.id, notification.user_id);
            inner
                .by_user
                .entry(notification.user_id)
                .or_default()
                .push(notification.clone());
            Ok(())
        }

        async fn get(&self, id: NotificationId) -> Result<Notification, PortError> {
            let inner = self.inner.read().await;
            inner
                .owners
                .get(&id)
                .and_then(|owner| inner.by_user.get(owner))
                .and_then(|list| list.iter().find(|n| n.id == id))
                .cloned()
                .ok_or_else(|| PortError::not_found("Notification", id))
        }

        async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, PortError> {
            let inner = self.inner.read().await;
            Ok(inner.by_user.get(&user_id).cloned().unwrap_or_default())
        }

        async fn mark_read(&self, id: NotificationId) -> Result<Notification, PortError> {
            let mut inner = self.inner.write().await;
            let notification = inner
                .find_mut(id)
                .ok_or_else(|| PortError::not_found("Notification", id))?;
            notification.mark_read();
            Ok(notification.clone())
        }

        async fn mark_all_read(&self, user_id: UserId) -> Result<usize, PortError> {
            let mut inner = self.inner.write().await;
            let list = inner
                .by_user
                .get_mut(&user_id)
                .filter(|list| !list.is_empty())
                .ok_or_else(|| PortError::not_found("Notifications for user", user_id))?;

            let mut flipped = 0;
            for notification in list.iter_mut() {
                if notification.mark_read() {
                    flipped += 1;
                }
            }
            Ok(flipped)
        }
    }
}

//! Notification store service

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use core_kernel::{NotificationId, UserId};
use crate::error::NotificationError;
use crate::notification::{NewNotification, Notification};
use crate::ports::NotificationPort;

/// Append-mostly store of user notifications
///
/// Cheap to clone; clones share the same port.
#[derive(Clone)]
pub struct NotificationStore {
    port: Arc<dyn NotificationPort>,
}

impl NotificationStore {
    pub fn new(port: Arc<dyn NotificationPort>) -> Self {
        Self { port }
    }

    /// Records a new unread notification
    pub async fn create(&self, request: NewNotification) -> Result<Notification, NotificationError> {
        request.validate()?;

        let notification = Notification::from_request(request, Utc::now());
        self.port.insert(&notification).await?;

        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            notification_type = %notification.notification_type,
            "Notification created"
        );
        Ok(notification)
    }

    /// Records a notification on behalf of another domain
    ///
    /// Delivery is best-effort: a failure is logged and swallowed so that the
    /// caller's financial mutation stays committed.
    pub async fn emit(&self, request: NewNotification) -> Option<Notification> {
        let user_id = request.user_id;
        let notification_type = request.notification_type;

        match self.create(request).await {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    notification_type = %notification_type,
                    error = %e,
                    "Dropping notification"
                );
                None
            }
        }
    }

    /// Retrieves a single notification
    pub async fn get(&self, id: NotificationId) -> Result<Notification, NotificationError> {
        Ok(self.port.get(id).await?)
    }

    /// Lists a user's notifications, newest first
    ///
    /// Notifications created within the same instant keep the most recently
    /// inserted one first.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationError> {
        let mut notifications = self.port.list_for_user(user_id).await?;
        notifications.reverse();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Lists a user's unread notifications, newest first
    pub async fn get_unread_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationError> {
        let notifications = self.get_for_user(user_id).await?;
        Ok(notifications.into_iter().filter(|n| !n.read).collect())
    }

    /// Marks one notification as read
    pub async fn mark_read(&self, id: NotificationId) -> Result<Notification, NotificationError> {
        let notification = self.port.mark_read(id).await?;
        debug!(notification_id = %id, "Notification marked read");
        Ok(notification)
    }

    /// Marks every notification of a user as read, returning how many changed
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<usize, NotificationError> {
        let flipped = self.port.mark_all_read(user_id).await?;
        debug!(user_id = %user_id, flipped, "Notifications marked read");
        Ok(flipped)
    }

    /// Counts a user's unread notifications
    pub async fn unread_count(&self, user_id: UserId) -> Result<usize, NotificationError> {
        let notifications = self.port.list_for_user(user_id).await?;
        Ok(notifications.iter().filter(|n| !n.read).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationType;
    use crate::ports::memory::InMemoryNotificationPort;

    fn store() -> NotificationStore {
        NotificationStore::new(Arc::new(InMemoryNotificationPort::new()))
    }

    fn request(user_id: UserId, title: &str) -> NewNotification {
        NewNotification::new(user_id, NotificationType::Compromis, title, "message")
    }

    #[tokio::test]
    async fn test_create_defaults_to_unread() {
        let store = store();
        let user = UserId::new();

        let created = store.create(request(user, "first")).await.unwrap();

        assert!(!created.read);
        assert_eq!(store.unread_count(user).await.unwrap(), 1);
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_get_for_user_newest_first() {
        let store = store();
        let user = UserId::new();

        store.create(request(user, "first")).await.unwrap();
        store.create(request(user, "second")).await.unwrap();
        store.create(request(user, "third")).await.unwrap();

        let titles: Vec<_> = store
            .get_for_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_emit_swallows_validation_failure() {
        let store = store();
        let user = UserId::new();

        assert!(store.emit(request(user, "")).await.is_none());
        assert_eq!(store.unread_count(user).await.unwrap(), 0);
    }
}

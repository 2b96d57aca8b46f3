//! Tier crossing detection

use serde_json::json;
use tracing::debug;

use core_kernel::{Percentage, UserId};
use domain_notification::{NewNotification, Notification, NotificationStore, NotificationType};

/// Notifies an agent when their commission percentage goes up
///
/// Stateless: callers pass the percentage before and after the change they
/// just committed, so the same crossing is never reported twice.
#[derive(Clone)]
pub struct ThresholdNotifier {
    notifications: NotificationStore,
}

impl ThresholdNotifier {
    pub fn new(notifications: NotificationStore) -> Self {
        Self { notifications }
    }

    /// Returns true if moving from `old` to `new` is a promotion
    pub fn crossed(old: Percentage, new: Percentage) -> bool {
        new > old
    }

    /// Emits one `CommissionThreshold` notification if `new > old`
    pub async fn check_threshold(
        &self,
        user_id: UserId,
        old: Percentage,
        new: Percentage,
    ) -> Option<Notification> {
        if !Self::crossed(old, new) {
            debug!(user_id = %user_id, old = %old, new = %new, "No tier crossed");
            return None;
        }

        let request = NewNotification::new(
            user_id,
            NotificationType::CommissionThreshold,
            "Nouveau palier de commission atteint",
            format!(
                "Félicitations ! Votre commission passe de {} à {}.",
                old, new
            ),
        )
        .with_data(json!({
            "old_percentage": old.value(),
            "new_percentage": new.value(),
        }));

        self.notifications.emit(request).await
    }
}

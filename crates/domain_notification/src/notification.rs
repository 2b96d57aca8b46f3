//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use core_kernel::{NotificationId, UserId};
use crate::error::NotificationError;

/// Kind of event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A sale agreement (compromis de vente) was registered
    Compromis,
    /// The agent moved into a higher commission tier
    CommissionThreshold,
    /// An invoice was submitted for approval
    InvoiceSubmitted,
    /// An invoice was approved
    InvoiceApproved,
    /// An invoice was paid
    InvoicePaid,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Compromis => "compromis",
            NotificationType::CommissionThreshold => "commission_threshold",
            NotificationType::InvoiceSubmitted => "invoice_submitted",
            NotificationType::InvoiceApproved => "invoice_approved",
            NotificationType::InvoicePaid => "invoice_paid",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compromis" => Ok(NotificationType::Compromis),
            "commission_threshold" => Ok(NotificationType::CommissionThreshold),
            "invoice_submitted" => Ok(NotificationType::InvoiceSubmitted),
            "invoice_approved" => Ok(NotificationType::InvoiceApproved),
            "invoice_paid" => Ok(NotificationType::InvoicePaid),
            other => Err(NotificationError::Validation(format!(
                "unknown notification type '{}'",
                other
            ))),
        }
    }
}

/// A notification request, before the store assigns id, read flag and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<Value>,
}

impl NewNotification {
    pub fn new(
        user_id: UserId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches structured data (amounts, referenced ids)
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), NotificationError> {
        if self.title.trim().is_empty() {
            return Err(NotificationError::Validation("title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Notification {
    /// Materialises a request as an unread notification
    pub fn from_request(request: NewNotification, created_at: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::new_v7(),
            user_id: request.user_id,
            notification_type: request.notification_type,
            title: request.title,
            message: request.message,
            read: false,
            created_at,
            data: request.data,
        }
    }

    /// Flips the read flag; returns false if it was already read
    pub fn mark_read(&mut self) -> bool {
        let flipped = !self.read;
        self.read = true;
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_round_trips_through_str() {
        for t in [
            NotificationType::Compromis,
            NotificationType::CommissionThreshold,
            NotificationType::InvoiceSubmitted,
            NotificationType::InvoiceApproved,
            NotificationType::InvoicePaid,
        ] {
            assert_eq!(t.as_str().parse::<NotificationType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_type_is_validation_error() {
        let err = "appointment".parse::<NotificationType>().unwrap_err();
        assert!(matches!(err, NotificationError::Validation(_)));
    }

    #[test]
    fn test_from_request_starts_unread() {
        let request = NewNotification::new(
            UserId::new(),
            NotificationType::InvoicePaid,
            "Facture payée",
            "Your invoice was paid",
        )
        .with_data(json!({ "amount": "160000" }));

        let mut notification = Notification::from_request(request.clone(), Utc::now());
        assert!(!notification.read);
        assert_eq!(notification.data, request.data);

        assert!(notification.mark_read());
        assert!(!notification.mark_read());
    }

    #[test]
    fn test_blank_title_rejected() {
        let request = NewNotification::new(UserId::new(), NotificationType::Compromis, "  ", "m");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_serialized_type_is_snake_case() {
        let json = serde_json::to_string(&NotificationType::CommissionThreshold).unwrap();
        assert_eq!(json, "\"commission_threshold\"");
    }
}

//! In-app notifications, newest first.

use crate::subscription::{self, Subscription};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Link shown alongside a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

/// A notification before it is assigned an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.action = Some(NotificationAction {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    fn into_notification(self, id: String) -> Notification {
        Notification {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp: Utc::now(),
            read: false,
            action: self.action,
        }
    }
}

/// Holds the notification list and publishes it on every change.
pub struct NotificationCenter {
    notifications: Mutex<Vec<Notification>>,
    updates: watch::Sender<Vec<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_notifications(Vec::new())
    }

    /// Creates a center seeded with two unread sample notifications.
    pub fn with_demo_notifications() -> Self {
        let seeded = vec![
            NotificationDraft::new(
                NotificationKind::Info,
                "New Document Shared",
                "Speech therapy assessment report has been uploaded",
            )
            .with_action("View Document", "/dashboard/documents")
            .into_notification("1".to_string()),
            NotificationDraft::new(
                NotificationKind::Success,
                "Goal Achieved",
                "Reading comprehension goal has been met",
            )
            .with_action("View Progress", "/dashboard/progress")
            .into_notification("2".to_string()),
        ];
        Self::with_notifications(seeded)
    }

    fn with_notifications(notifications: Vec<Notification>) -> Self {
        Self {
            updates: subscription::channel(notifications.clone()),
            notifications: Mutex::new(notifications),
        }
    }

    pub fn subscribe(&self) -> Subscription<Vec<Notification>> {
        Subscription::new(self.updates.subscribe())
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Adds an unread notification at the front and returns its id.
    pub async fn add(&self, draft: NotificationDraft) -> String {
        let id = Uuid::now_v7().to_string();
        let notification = draft.into_notification(id.clone());
        debug!(id = %id, title = %notification.title, "Notification added");

        let mut notifications = self.notifications.lock().await;
        notifications.insert(0, notification);
        self.updates.send_replace(notifications.clone());
        id
    }

    /// Marks one notification read. Returns `false` if `id` is unknown.
    ///
    /// Subscribers are notified either way.
    pub async fn mark_as_read(&self, id: &str) -> bool {
        let mut notifications = self.notifications.lock().await;
        let found = match notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        };
        self.updates.send_replace(notifications.clone());
        found
    }

    /// Marks every notification read and returns how many changed.
    pub async fn mark_all_as_read(&self) -> usize {
        let mut notifications = self.notifications.lock().await;
        let mut changed = 0;
        for notification in notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.updates.send_replace(notifications.clone());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_notifications_unread() {
        let center = NotificationCenter::with_demo_notifications();
        assert_eq!(center.notifications().await.len(), 2);
        assert_eq!(center.unread_count().await, 2);
    }

    #[tokio::test]
    async fn test_add_prepends_and_notifies() {
        let center = NotificationCenter::with_demo_notifications();
        let mut subscription = center.subscribe();
        assert_eq!(subscription.current().len(), 2);

        let id = center
            .add(NotificationDraft::new(
                NotificationKind::Warning,
                "Meeting moved",
                "The IEP review is now on Thursday",
            ))
            .await;

        let snapshot = subscription.changed().await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].id, id);
        assert!(!snapshot[0].read);
        assert!(snapshot[0].action.is_none());
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let center = NotificationCenter::with_demo_notifications();
        assert!(center.mark_as_read("2").await);
        assert!(!center.mark_as_read("nope").await);

        let notifications = center.notifications().await;
        assert!(!notifications[0].read);
        assert!(notifications[1].read);
        assert_eq!(center.unread_count().await, 1);
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let center = NotificationCenter::with_demo_notifications();
        let subscription = center.subscribe();

        assert_eq!(center.mark_all_as_read().await, 2);
        assert!(subscription.has_changed());
        assert_eq!(center.unread_count().await, 0);
        assert_eq!(center.mark_all_as_read().await, 0);
    }

    #[test]
    fn test_notification_json() {
        let notification = NotificationDraft::new(NotificationKind::Error, "Upload failed", "Try again")
            .into_notification("n1".to_string());
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["read"], false);
        assert!(json.get("action").is_none());
    }
}

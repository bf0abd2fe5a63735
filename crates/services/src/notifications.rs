use async_trait::async_trait;
use tracing::info;

use anatomize_core::model::Region;

use crate::error::NotifyError;

/// Longest notification body shown before truncation.
pub const NOTIFICATION_BODY_LIMIT: usize = 120;

const EMPTY_REPLY_BODY: &str = "Your anatomy tutor replied.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Local notification delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether the host allows local notifications.
    async fn permission_granted(&self) -> bool;

    /// Raise a notification immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the host rejects the notification.
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn permission_granted(&self) -> bool {
        true
    }

    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(title = %notification.title, body = %notification.body, "notification");
        Ok(())
    }
}

/// Build the notification announcing a tutor reply for `region`.
#[must_use]
pub fn reply_notification(region: Region, reply: &str) -> Notification {
    let reply = reply.trim();
    let body = if reply.is_empty() {
        EMPTY_REPLY_BODY.to_string()
    } else if reply.chars().count() > NOTIFICATION_BODY_LIMIT {
        let prefix: String = reply.chars().take(NOTIFICATION_BODY_LIMIT - 3).collect();
        format!("{}…", prefix.trim_end())
    } else {
        reply.to_string()
    };
    Notification {
        title: format!("New {region} tutor reply"),
        body,
    }
}

//! Driving ports for recipients managing their notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, UserId};

/// Domain use-case port for notification mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one of the actor's notifications read.
    async fn mark_read(&self, actor: &UserId, id: &NotificationId) -> Result<Notification, Error>;

    /// Delete one of the actor's notifications.
    async fn delete(&self, actor: &UserId, id: &NotificationId) -> Result<(), Error>;
}

/// Domain use-case port for notification reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Notifications of `user_id`, newest first; only the user may ask.
    async fn list_notifications(
        &self,
        actor: &UserId,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error>;
}

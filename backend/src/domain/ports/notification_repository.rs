//! Port for the notification outbox.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// Port for storing per-user notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Fetch a notification by identifier.
    async fn find(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Notifications for `recipient`, newest first.
    async fn list_for_recipient(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Flag a notification as read; returns `false` when it does not exist.
    async fn mark_read(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError>;

    /// Delete a notification; returns `false` when it does not exist.
    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError>;
}

//! Recipient-facing notification management.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::notification_dispatcher::map_notification_repository_error;
use crate::domain::ports::{NotificationCommand, NotificationQuery, NotificationRepository};
use crate::domain::{Error, Notification, NotificationId, UserId};

fn notification_not_found() -> Error {
    Error::not_found("notification not found")
}

/// Lets users read and tidy their own notifications.
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    /// Create a service over the notification repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

impl<N> NotificationService<N>
where
    N: NotificationRepository,
{
    /// Another user's notification is reported as missing.
    async fn owned(&self, actor: &UserId, id: &NotificationId) -> Result<Notification, Error> {
        self.notifications
            .find(id)
            .await
            .map_err(map_notification_repository_error)?
            .filter(|notification| &notification.recipient_id == actor)
            .ok_or_else(notification_not_found)
    }
}

#[async_trait]
impl<N> NotificationCommand for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn mark_read(&self, actor: &UserId, id: &NotificationId) -> Result<Notification, Error> {
        let mut notification = self.owned(actor, id).await?;
        let updated = self
            .notifications
            .mark_read(id)
            .await
            .map_err(map_notification_repository_error)?;
        if !updated {
            return Err(notification_not_found());
        }
        notification.is_read = true;
        Ok(notification)
    }

    async fn delete(&self, actor: &UserId, id: &NotificationId) -> Result<(), Error> {
        self.owned(actor, id).await?;
        let deleted = self
            .notifications
            .delete(id)
            .await
            .map_err(map_notification_repository_error)?;
        if !deleted {
            return Err(notification_not_found());
        }
        info!(notification_id = %id, "notification deleted");
        Ok(())
    }
}

#[async_trait]
impl<N> NotificationQuery for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list_notifications(
        &self,
        actor: &UserId,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error> {
        if actor != user_id {
            return Err(Error::not_found("user not found"));
        }
        self.notifications
            .list_for_recipient(user_id)
            .await
            .map_err(map_notification_repository_error)
    }
}

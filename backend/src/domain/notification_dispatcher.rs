//! Notification fan-out: persist an in-app notification, then email it.
//!
//! The notification row is the source of truth. Email delivery is best
//! effort; transport failures are logged and never reach the caller.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MailTransport, NotificationRepository, NotificationRepositoryError,
};
use crate::domain::{EmailAddress, Error, Notification, NotificationMessage, User};

/// Settings shared by everything that sends mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Sender address for outbound email.
    pub from_address: EmailAddress,
}

pub(crate) fn map_notification_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

/// Creates notifications and mirrors them by email.
pub struct NotificationDispatcher<N> {
    notifications: Arc<N>,
    mail: Arc<dyn MailTransport>,
    settings: NotificationSettings,
    clock: Arc<dyn Clock>,
}

impl<N> Clone for NotificationDispatcher<N> {
    fn clone(&self) -> Self {
        Self {
            notifications: Arc::clone(&self.notifications),
            mail: Arc::clone(&self.mail),
            settings: self.settings.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<N> NotificationDispatcher<N> {
    /// Create a dispatcher writing to `notifications` and sending through `mail`.
    pub fn new(
        notifications: Arc<N>,
        mail: Arc<dyn MailTransport>,
        settings: NotificationSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            mail,
            settings,
            clock,
        }
    }
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationRepository,
{
    /// Store a notification for `recipient` and email them the same text.
    pub async fn notify(
        &self,
        recipient: &User,
        message: NotificationMessage,
    ) -> Result<Notification, Error> {
        let notification =
            Notification::unread(recipient.id, message.text.clone(), self.clock.utc());
        self.notifications
            .insert(&notification)
            .await
            .map_err(map_notification_repository_error)?;
        info!(
            notification_id = %notification.id,
            recipient_id = %recipient.id,
            "notification stored"
        );

        let email = message.to_email(&self.settings.from_address, &recipient.email);
        if let Err(error) = self.mail.send(&email).await {
            warn!(
                error = %error,
                kind = error.kind(),
                recipient_id = %recipient.id,
                subject = %email.subject,
                "notification email not delivered"
            );
        }
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MailTransportError, MockMailTransport, MockNotificationRepository};
    use crate::domain::{ErrorCode, UserId, Username};
    use chrono::Utc;
    use mockable::DefaultClock;

    fn recipient() -> User {
        User {
            id: UserId::random(),
            username: Username::new("u2").expect("username"),
            email: EmailAddress::new("u2@example.com").expect("email"),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    fn settings() -> NotificationSettings {
        NotificationSettings {
            from_address: EmailAddress::new("noreply@gameconnect.test").expect("email"),
        }
    }

    fn message() -> NotificationMessage {
        NotificationMessage {
            subject: "subject".to_owned(),
            text: "body".to_owned(),
        }
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_notification() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let mut mail = MockMailTransport::new();
        mail.expect_send()
            .times(1)
            .returning(|_| Err(MailTransportError::transport("timeout")));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(repo),
            Arc::new(mail),
            settings(),
            Arc::new(DefaultClock),
        );
        let user = recipient();
        let notification = dispatcher
            .notify(&user, message())
            .await
            .expect("notification stored");
        assert_eq!(notification.recipient_id, user.id);
        assert_eq!(notification.description, "body");
        assert!(!notification.is_read);
    }

    #[tokio::test]
    async fn email_goes_to_recipient_from_configured_sender() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().returning(|_| Ok(()));
        let mut mail = MockMailTransport::new();
        mail.expect_send()
            .withf(|email| {
                email.to.as_str() == "u2@example.com"
                    && email.from.as_str() == "noreply@gameconnect.test"
                    && email.text == "body"
            })
            .times(1)
            .returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(repo),
            Arc::new(mail),
            settings(),
            Arc::new(DefaultClock),
        );
        dispatcher
            .notify(&recipient(), message())
            .await
            .expect("notification stored");
    }

    #[tokio::test]
    async fn storage_failure_skips_email() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .returning(|_| Err(NotificationRepositoryError::query("boom")));
        let mut mail = MockMailTransport::new();
        mail.expect_send().times(0);

        let dispatcher = NotificationDispatcher::new(
            Arc::new(repo),
            Arc::new(mail),
            settings(),
            Arc::new(DefaultClock),
        );
        let err = dispatcher
            .notify(&recipient(), message())
            .await
            .expect_err("storage failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}

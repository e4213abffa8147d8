//! Newsletter sign-up.
//!
//! Both the list provider and the welcome email are best effort: a
//! syntactically valid address always yields success.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::notification_dispatcher::NotificationSettings;
use crate::domain::ports::{MailTransport, MailingList, SubscriptionCommand};
use crate::domain::{EmailAddress, Error, NotificationMessage};

/// Adds subscribers to the mailing list and greets them.
#[derive(Clone)]
pub struct SubscriptionService {
    list: Arc<dyn MailingList>,
    mail: Arc<dyn MailTransport>,
    settings: NotificationSettings,
}

impl SubscriptionService {
    /// Create a subscription service.
    pub fn new(
        list: Arc<dyn MailingList>,
        mail: Arc<dyn MailTransport>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            list,
            mail,
            settings,
        }
    }
}

#[async_trait]
impl SubscriptionCommand for SubscriptionService {
    async fn subscribe(&self, email: &EmailAddress) -> Result<(), Error> {
        match self.list.add_member(email).await {
            Ok(()) => info!("mailing list member added"),
            Err(error) => warn!(
                error = %error,
                kind = error.kind(),
                "mailing list subscription failed"
            ),
        }

        let welcome = NotificationMessage::welcome().to_email(&self.settings.from_address, email);
        if let Err(error) = self.mail.send(&welcome).await {
            warn!(error = %error, kind = error.kind(), "welcome email not delivered");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MailTransportError, MailingListError, MockMailTransport, MockMailingList,
    };

    fn settings() -> NotificationSettings {
        NotificationSettings {
            from_address: EmailAddress::new("noreply@gameconnect.test").expect("email"),
        }
    }

    fn subscriber() -> EmailAddress {
        EmailAddress::new("fan@example.com").expect("email")
    }

    #[tokio::test]
    async fn subscribe_adds_member_and_sends_welcome() {
        let mut list = MockMailingList::new();
        list.expect_add_member()
            .withf(|email| email.as_str() == "fan@example.com")
            .times(1)
            .returning(|_| Ok(()));
        let mut mail = MockMailTransport::new();
        mail.expect_send()
            .withf(|email| {
                email.subject == "Welcome to Our Mailing List"
                    && email.to.as_str() == "fan@example.com"
            })
            .times(1)
            .returning(|_| Ok(()));

        SubscriptionService::new(Arc::new(list), Arc::new(mail), settings())
            .subscribe(&subscriber())
            .await
            .expect("subscribed");
    }

    #[tokio::test]
    async fn provider_failures_are_swallowed() {
        let mut list = MockMailingList::new();
        list.expect_add_member()
            .returning(|_| Err(MailingListError::rejected(400_u16, "Member Exists")));
        let mut mail = MockMailTransport::new();
        mail.expect_send()
            .returning(|_| Err(MailTransportError::transport("connection reset")));

        SubscriptionService::new(Arc::new(list), Arc::new(mail), settings())
            .subscribe(&subscriber())
            .await
            .expect("failures are not surfaced");
    }
}

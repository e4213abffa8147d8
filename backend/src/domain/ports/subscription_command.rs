//! Driving port for mailing-list sign-ups.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error};

/// Domain use-case port for newsletter subscription.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Subscribe `email` and send a welcome message.
    ///
    /// Provider failures are logged, never surfaced.
    async fn subscribe(&self, email: &EmailAddress) -> Result<(), Error>;
}

//! Port for the marketing mailing-list provider.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mailing-list adapters.
    pub enum MailingListError {
        /// The provider could not be reached.
        Transport { message: String } => "mailing list request failed: {message}",
        /// The provider answered with an error status.
        Rejected { status: u16, message: String } => "mailing list rejected member ({status}): {message}",
    }
}

/// Manage subscribers of the configured list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailingList: Send + Sync {
    /// Subscribe `email` to the list.
    async fn add_member(&self, email: &EmailAddress) -> Result<(), MailingListError>;
}

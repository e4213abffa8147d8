//! Port for sending email through an external provider.

use async_trait::async_trait;

use crate::domain::OutboundEmail;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transport adapters.
    pub enum MailTransportError {
        /// The provider could not be reached.
        Transport { message: String } => "mail transport failed: {message}",
        /// The provider answered but refused the message.
        Rejected { status: u16, message: String } => "mail provider rejected message ({status}): {message}",
    }
}

/// Deliver a single email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send `email`; delivery is best effort.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailTransportError>;
}

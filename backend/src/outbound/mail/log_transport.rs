//! Mail transport that writes messages to the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::OutboundEmail;
use crate::domain::ports::{MailTransport, MailTransportError};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailTransportError> {
        info!(
            to = %email.to,
            from = %email.from,
            subject = %email.subject,
            "mail provider not configured; message logged only"
        );
        Ok(())
    }
}

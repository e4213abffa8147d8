//! Mailing list that only records subscriptions in the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailAddress;
use crate::domain::ports::{MailingList, MailingListError};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailingList;

#[async_trait]
impl MailingList for LogMailingList {
    async fn add_member(&self, email: &EmailAddress) -> Result<(), MailingListError> {
        info!(%email, "mailing list not configured; subscription logged only");
        Ok(())
    }
}

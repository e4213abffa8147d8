//! Newsletter mailing-list adapters.

mod log_list;
mod mailchimp;

pub use log_list::LogMailingList;
pub use mailchimp::{MailchimpMailingList, MailchimpSettings, MailchimpSetupError};

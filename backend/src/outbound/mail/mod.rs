//! Outbound email adapters.
//!
//! [`MandrillMailTransport`] talks to a Mandrill-compatible `messages/send`
//! endpoint. [`LogMailTransport`] only logs, and is used when no provider is
//! configured.

mod log_transport;
mod mandrill;

pub use log_transport::LogMailTransport;
pub use mandrill::{MailSettings, MandrillMailTransport};

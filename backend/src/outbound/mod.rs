//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel
//! - **memory**: process-local repositories for development and tests
//! - **mail**: Mandrill transactional email and a logging fallback
//! - **mailing_list**: Mailchimp newsletter subscription
//! - **password**: Argon2 password hashing
//!
//! Adapters translate between domain types and wire or storage shapes. They
//! contain no business rules.

pub mod mail;
pub mod mailing_list;
pub mod memory;
pub mod password;
pub mod persistence;

const BODY_PREVIEW_MAX: usize = 160;

/// Render a provider response body for logs and error messages.
///
/// Whitespace runs collapse to single spaces and the result is capped so a
/// verbose HTML error page cannot flood the log.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= BODY_PREVIEW_MAX {
        return collapsed;
    }
    let mut preview: String = collapsed.chars().take(BODY_PREVIEW_MAX).collect();
    preview.push('…');
    preview
}

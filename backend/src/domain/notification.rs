//! In-app notifications and the emails that mirror them.

use chrono::{DateTime, Utc};

use super::catalogue::GameName;
use super::identifier::define_uuid_id;
use super::offer::OfferType;
use super::user::{EmailAddress, User, UserId};

define_uuid_id! {
    /// Identifier of a notification.
    pub struct NotificationId;
}

/// Message shown to a user in their notification list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub description: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification for `recipient_id`.
    #[must_use]
    pub fn unread(recipient_id: UserId, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::random(),
            recipient_id,
            description,
            is_read: false,
            created_at: now,
        }
    }
}

/// Email handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
    pub from: EmailAddress,
    pub to: EmailAddress,
}

/// Subject and body of a notification, rendered for both channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub text: String,
}

/// `"<type label>-<game name>"`, the way listings are named in messages.
#[must_use]
pub fn listing_label(offer_type: OfferType, game: &GameName) -> String {
    format!("{}-{}", offer_type.label(), game)
}

impl NotificationMessage {
    /// Tell a customer their counter-offer won.
    #[must_use]
    pub fn offer_accepted(owner: &User, offer_type: OfferType, game: &GameName) -> Self {
        Self {
            subject: "Your offer has been accepted".to_owned(),
            text: format!(
                "User {} has accepted your offer for {}. Please reach out to them via email {}",
                owner.username,
                listing_label(offer_type, game),
                owner.email,
            ),
        }
    }

    /// Tell a listing owner someone made a counter-offer.
    #[must_use]
    pub fn counter_offer_received(customer: &User, offer_type: OfferType, game: &GameName) -> Self {
        Self {
            subject: "New offer for your listing".to_owned(),
            text: format!(
                "User {} has made an offer for your listing {}.",
                customer.username,
                listing_label(offer_type, game),
            ),
        }
    }

    /// Welcome message for new mailing-list subscribers.
    #[must_use]
    pub fn welcome() -> Self {
        Self {
            subject: "Welcome to Our Mailing List".to_owned(),
            text: "Thank you for subscribing to our mailing list!".to_owned(),
        }
    }

    /// Render the message as an email from `from` to `to`.
    #[must_use]
    pub fn to_email(&self, from: &EmailAddress, to: &EmailAddress) -> OutboundEmail {
        OutboundEmail {
            subject: self.subject.clone(),
            text: self.text.clone(),
            html: format!("<p>{}</p>", escape_html(&self.text)),
            from: from.clone(),
            to: to.clone(),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

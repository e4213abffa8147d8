//! Diesel row structs and their conversions into domain entities.
//!
//! Rows never leave the persistence layer. Reading a row re-runs domain
//! validation, so a value that slipped past it surfaces as a
//! [`CorruptRow`] instead of a malformed entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, customer_offers, exchange_offers, games, notifications, users};
use crate::domain::{
    Article, ArticleSlug, CounterOfferStatus, CustomerOffer, CustomerOfferId, EmailAddress,
    ExchangeOffer, ExchangeOfferId, Game, GameId, GameName, ListingStatus, Notification,
    NotificationId, OfferDescription, OfferType, PasswordDigest, Price, User, UserAccount, UserId,
    Username,
};

/// A stored row failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row {key}: {message}")]
pub(crate) struct CorruptRow {
    pub table: &'static str,
    pub key: String,
    pub message: String,
}

impl CorruptRow {
    fn new(table: &'static str, key: impl ToString, err: impl ToString) -> Self {
        Self {
            table,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for UserRow {
    fn from(account: &UserAccount) -> Self {
        let user = &account.user;
        Self {
            id: user.id.into(),
            username: user.username.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            password_hash: account.password.as_str().to_owned(),
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for UserAccount {
    type Error = CorruptRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt =
            |err: crate::domain::UserValidationError| CorruptRow::new("users", row.id, err);
        Ok(Self {
            user: User {
                id: UserId::from_uuid(row.id),
                username: Username::new(row.username.as_str()).map_err(corrupt)?,
                email: EmailAddress::new(row.email.as_str()).map_err(corrupt)?,
                is_staff: row.is_staff,
                created_at: row.created_at,
            },
            password: PasswordDigest::new(row.password_hash),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Game> for GameRow {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.into(),
            name: game.name.as_str().to_owned(),
            description: game.description.clone(),
            created_at: game.created_at,
        }
    }
}

impl TryFrom<GameRow> for Game {
    type Error = CorruptRow;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let name = GameName::new(row.name).map_err(|err| CorruptRow::new("games", row.id, err))?;
        Ok(Self {
            id: GameId::from_uuid(row.id),
            name,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub slug: String,
    pub game_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Article> for ArticleRow {
    fn from(article: &Article) -> Self {
        Self {
            slug: article.slug.as_str().to_owned(),
            game_id: article.game_id.into(),
            title: article.title.clone(),
            content: article.content.clone(),
            created_at: article.created_at,
        }
    }
}

impl TryFrom<ArticleRow> for Article {
    type Error = CorruptRow;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let slug = ArticleSlug::new(row.slug.as_str())
            .map_err(|err| CorruptRow::new("articles", &row.slug, err))?;
        Ok(Self {
            slug,
            game_id: GameId::from_uuid(row.game_id),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = exchange_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExchangeOfferRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub offer_type: String,
    pub game_id: Uuid,
    pub price_cents: Option<i64>,
    pub description: String,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&ExchangeOffer> for ExchangeOfferRow {
    fn from(listing: &ExchangeOffer) -> Self {
        Self {
            id: listing.id.into(),
            owner_id: listing.owner_id.into(),
            offer_type: listing.offer_type.code().to_owned(),
            game_id: listing.game_id.into(),
            price_cents: listing.price.map(|price| price.cents()),
            description: listing.description.as_str().to_owned(),
            is_open: listing.status.is_open(),
            created_at: listing.created_at,
        }
    }
}

fn price_from_cents(
    table: &'static str,
    key: Uuid,
    cents: Option<i64>,
) -> Result<Option<Price>, CorruptRow> {
    cents
        .map(Price::from_cents)
        .transpose()
        .map_err(|err| CorruptRow::new(table, key, err))
}

impl TryFrom<ExchangeOfferRow> for ExchangeOffer {
    type Error = CorruptRow;

    fn try_from(row: ExchangeOfferRow) -> Result<Self, Self::Error> {
        let corrupt = |err: crate::domain::OfferValidationError| {
            CorruptRow::new("exchange_offers", row.id, err)
        };
        Ok(Self {
            id: ExchangeOfferId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            offer_type: row.offer_type.parse::<OfferType>().map_err(corrupt)?,
            game_id: GameId::from_uuid(row.game_id),
            price: price_from_cents("exchange_offers", row.id, row.price_cents)?,
            description: OfferDescription::new(row.description.as_str()).map_err(corrupt)?,
            status: ListingStatus::from_open_flag(row.is_open),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = customer_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerOfferRow {
    pub id: Uuid,
    pub exchange_offer_id: Uuid,
    pub customer_id: Uuid,
    pub game_id: Uuid,
    pub price_cents: Option<i64>,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CustomerOffer> for CustomerOfferRow {
    fn from(offer: &CustomerOffer) -> Self {
        Self {
            id: offer.id.into(),
            exchange_offer_id: offer.exchange_offer_id.into(),
            customer_id: offer.customer_id.into(),
            game_id: offer.game_id.into(),
            price_cents: offer.price.map(|price| price.cents()),
            description: offer.description.as_str().to_owned(),
            status: offer.status.code().to_owned(),
            created_at: offer.created_at,
        }
    }
}

impl TryFrom<CustomerOfferRow> for CustomerOffer {
    type Error = CorruptRow;

    fn try_from(row: CustomerOfferRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<CounterOfferStatus>()
            .map_err(|err| CorruptRow::new("customer_offers", row.id, err))?;
        let description = OfferDescription::new(row.description.as_str())
            .map_err(|err| CorruptRow::new("customer_offers", row.id, err))?;
        Ok(Self {
            id: CustomerOfferId::from_uuid(row.id),
            exchange_offer_id: ExchangeOfferId::from_uuid(row.exchange_offer_id),
            customer_id: UserId::from_uuid(row.customer_id),
            game_id: GameId::from_uuid(row.game_id),
            price: price_from_cents("customer_offers", row.id, row.price_cents)?,
            description,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub description: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.into(),
            recipient_id: notification.recipient_id.into(),
            description: notification.description.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::from_uuid(row.id),
            recipient_id: UserId::from_uuid(row.recipient_id),
            description: row.description,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

/// Convert every row, failing on the first corrupt one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, CorruptRow>
where
    T: TryFrom<R, Error = CorruptRow>,
{
    rows.into_iter().map(T::try_from).collect()
}

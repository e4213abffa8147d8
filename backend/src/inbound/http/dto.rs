//! JSON response bodies shared by several handlers.
//!
//! Domain types stay free of serde and utoipa; these DTOs are the wire shape.
//! Prices travel as decimal strings with two places so clients never see
//! binary floating point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{CounterOfferView, ListingView};
use crate::domain::{Article, Game, Notification, User};

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "trader")]
    pub username: String,
    #[schema(example = "trader@example.com")]
    pub email: String,
    pub is_staff: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            username: user.username.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            is_staff: user.is_staff,
        }
    }
}

/// Game in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Uuid,
    #[schema(example = "Game 1")]
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id.into(),
            name: game.name.as_str().to_owned(),
            description: game.description,
            created_at: game.created_at,
        }
    }
}

/// Editorial article.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    #[schema(example = "test-game")]
    pub slug: String,
    pub game_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            slug: article.slug.as_str().to_owned(),
            game_id: article.game_id.into(),
            title: article.title,
            content: article.content,
            created_at: article.created_at,
        }
    }
}

/// Marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    /// `sell`, `exchange` or `buy`.
    #[schema(example = "sell")]
    pub offer_type: String,
    pub game_id: Uuid,
    pub game_name: String,
    #[schema(example = "10.00")]
    pub price: Option<String>,
    pub description: String,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ListingView> for ListingResponse {
    fn from(view: ListingView) -> Self {
        let ListingView {
            listing,
            game_name,
            owner_username,
        } = view;
        Self {
            id: listing.id.into(),
            owner_id: listing.owner_id.into(),
            owner_username: owner_username.as_str().to_owned(),
            offer_type: listing.offer_type.code().to_owned(),
            game_id: listing.game_id.into(),
            game_name: game_name.as_str().to_owned(),
            price: listing.price.map(|price| price.to_string()),
            description: listing.description.as_str().to_owned(),
            is_open: listing.status.is_open(),
            created_at: listing.created_at,
        }
    }
}

/// Counter-offer made against a listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub customer_id: Uuid,
    pub customer_username: String,
    pub game_id: Uuid,
    pub game_name: String,
    pub price: Option<String>,
    pub description: String,
    /// `pending`, `accepted` or `rejected`.
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<CounterOfferView> for CounterOfferResponse {
    fn from(view: CounterOfferView) -> Self {
        let CounterOfferView {
            offer,
            game_name,
            customer_username,
        } = view;
        Self {
            id: offer.id.into(),
            listing_id: offer.exchange_offer_id.into(),
            customer_id: offer.customer_id.into(),
            customer_username: customer_username.as_str().to_owned(),
            game_id: offer.game_id.into(),
            game_name: game_name.as_str().to_owned(),
            price: offer.price.map(|price| price.to_string()),
            description: offer.description.as_str().to_owned(),
            status: offer.status.code().to_owned(),
            created_at: offer.created_at,
        }
    }
}

/// In-app notification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub description: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.into(),
            description: notification.description,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

pub(crate) fn collect<T, D: From<T>>(items: Vec<T>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}

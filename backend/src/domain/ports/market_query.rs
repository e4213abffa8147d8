//! Driving port for marketplace reads.

use async_trait::async_trait;

use crate::domain::{
    CustomerOffer, Error, ExchangeOffer, ExchangeOfferId, GameName, Notification, User, UserId,
    Username,
};

/// Listing decorated with the names clients display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub listing: ExchangeOffer,
    pub game_name: GameName,
    pub owner_username: Username,
}

/// Counter-offer decorated with the names clients display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterOfferView {
    pub offer: CustomerOffer,
    pub game_name: GameName,
    pub customer_username: Username,
}

/// Listing with every counter-offer submitted against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetails {
    pub listing: ListingView,
    pub counter_offers: Vec<CounterOfferView>,
}

/// Private dashboard of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub user: User,
    pub active_offers: Vec<ListingView>,
    pub inactive_offers: Vec<ListingView>,
    pub notifications: Vec<Notification>,
}

/// Domain use-case port for marketplace reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketQuery: Send + Sync {
    /// Open listings, newest first; an unknown game name yields no listings.
    async fn list_open_listings(&self, game: Option<GameName>) -> Result<Vec<ListingView>, Error>;

    /// Newest open listing, if any.
    async fn latest_open_listing(&self) -> Result<Option<ListingView>, Error>;

    /// Owner-only view of a listing and its counter-offers.
    async fn listing_details(
        &self,
        actor: &UserId,
        listing_id: &ExchangeOfferId,
    ) -> Result<ListingDetails, Error>;

    /// Owner-only dashboard; any other actor gets `NotFound`.
    async fn user_page(&self, actor: &UserId, user_id: &UserId) -> Result<UserPage, Error>;
}

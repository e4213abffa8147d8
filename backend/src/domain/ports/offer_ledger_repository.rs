//! Port for the offer ledger: listings and their counter-offers.

use async_trait::async_trait;

use crate::domain::{
    CustomerOffer, CustomerOfferId, ExchangeOffer, ExchangeOfferId, GameId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by offer ledger adapters.
    pub enum OfferLedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "offer ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "offer ledger query failed: {message}",
        /// A referenced listing, game or user row does not exist.
        MissingReference { message: String } => "offer ledger reference missing: {message}",
        /// The listing closed before the counter-offer could be recorded.
        ListingClosed { listing_id: String } => "listing {listing_id} is closed",
    }
}

/// Result of atomically resolving a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingResolution {
    /// The listing was already closed; nothing changed.
    AlreadyClosed,
    /// The listing was closed by this call.
    Resolved {
        /// The accepted counter-offer, if the chosen id matched one.
        accepted: Option<CustomerOffer>,
        /// Number of counter-offers marked rejected.
        rejected: usize,
    },
}

/// Port for reading and mutating the offer ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferLedgerRepository: Send + Sync {
    /// Persist a new listing.
    async fn insert_listing(
        &self,
        listing: &ExchangeOffer,
    ) -> Result<(), OfferLedgerRepositoryError>;

    /// Fetch a listing regardless of status.
    async fn find_listing(
        &self,
        id: &ExchangeOfferId,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError>;

    /// Open listings, newest first, optionally restricted to one game.
    async fn list_open_listings(
        &self,
        game: Option<GameId>,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError>;

    /// Most recently created open listing.
    async fn latest_open_listing(
        &self,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError>;

    /// Every listing owned by `owner`, newest first.
    async fn list_listings_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError>;

    /// Persist a new counter-offer.
    ///
    /// The listing's openness is checked in the same atomic step as the
    /// insert; a listing closed in the meantime yields
    /// [`OfferLedgerRepositoryError::ListingClosed`].
    async fn insert_counter_offer(
        &self,
        offer: &CustomerOffer,
    ) -> Result<(), OfferLedgerRepositoryError>;

    /// Counter-offers for a listing in insertion order.
    async fn list_counter_offers(
        &self,
        listing: &ExchangeOfferId,
    ) -> Result<Vec<CustomerOffer>, OfferLedgerRepositoryError>;

    /// Close `listing` if still open, accepting `chosen` and rejecting every
    /// other counter-offer in the same atomic step.
    async fn resolve_listing(
        &self,
        listing: &ExchangeOfferId,
        chosen: &CustomerOfferId,
    ) -> Result<ListingResolution, OfferLedgerRepositoryError>;
}

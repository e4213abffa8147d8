//! Driving port for offer ledger mutations and the acceptance workflow.

use async_trait::async_trait;

use crate::domain::{
    CounterOfferDraft, CustomerOffer, CustomerOfferId, Error, ExchangeOffer, ExchangeOfferId,
    ListingDraft, UserId,
};

/// Request to open a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingRequest {
    pub owner_id: UserId,
    pub draft: ListingDraft,
}

/// Request to submit a counter-offer against an open listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCounterOfferRequest {
    pub listing_id: ExchangeOfferId,
    pub customer_id: UserId,
    pub draft: CounterOfferDraft,
}

/// Request to accept one counter-offer of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptCounterOfferRequest {
    pub actor: UserId,
    pub listing_id: ExchangeOfferId,
    pub chosen: CustomerOfferId,
}

/// What an accept call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceOutcome {
    /// The listing was closed earlier; nothing changed.
    AlreadyClosed,
    /// The listing was closed by this call.
    Closed {
        /// Accepted counter-offer, absent when the chosen id matched none.
        accepted: Option<CustomerOfferId>,
        /// Number of counter-offers rejected.
        rejected: usize,
    },
}

/// Domain use-case port for the marketplace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketCommand: Send + Sync {
    /// Open a listing; the game must exist.
    async fn create_listing(&self, request: CreateListingRequest) -> Result<ExchangeOffer, Error>;

    /// Submit a counter-offer and notify the listing owner.
    async fn create_counter_offer(
        &self,
        request: CreateCounterOfferRequest,
    ) -> Result<CustomerOffer, Error>;

    /// Run the acceptance workflow for the actor's listing.
    async fn accept_counter_offer(
        &self,
        request: AcceptCounterOfferRequest,
    ) -> Result<AcceptanceOutcome, Error>;
}

//! Acceptance workflow: the owner picks one counter-offer and the listing
//! closes.
//!
//! The ledger adapter performs the close and every counter-offer status change
//! as one atomic compare-and-swap, so two racing accepts cannot both apply.
//! Only the call that actually closed the listing notifies the winner.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::lookups::{listing_not_found, map_ledger_error, require_game, require_user};
use super::notification_dispatcher::NotificationDispatcher;
use crate::domain::ports::{
    AcceptCounterOfferRequest, AcceptanceOutcome, GameRepository, ListingResolution,
    NotificationRepository, OfferLedgerRepository, UserRepository,
};
use crate::domain::{CustomerOffer, Error, ExchangeOffer, NotificationMessage};

/// Resolves listings on behalf of their owners.
pub struct AcceptanceWorkflow<L, G, U, N> {
    ledger: Arc<L>,
    games: Arc<G>,
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N>,
}

impl<L, G, U, N> AcceptanceWorkflow<L, G, U, N> {
    /// Create a workflow over the given repositories.
    pub fn new(
        ledger: Arc<L>,
        games: Arc<G>,
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N>,
    ) -> Self {
        Self {
            ledger,
            games,
            users,
            dispatcher,
        }
    }
}

impl<L, G, U, N> AcceptanceWorkflow<L, G, U, N>
where
    L: OfferLedgerRepository,
    G: GameRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    /// Accept `request.chosen` on the actor's listing.
    ///
    /// A listing the actor does not own is reported as missing. Accepting on a
    /// closed listing changes nothing and still succeeds.
    pub async fn accept(
        &self,
        request: AcceptCounterOfferRequest,
    ) -> Result<AcceptanceOutcome, Error> {
        let listing = self
            .ledger
            .find_listing(&request.listing_id)
            .await
            .map_err(map_ledger_error)?
            .filter(|listing| listing.is_owned_by(&request.actor))
            .ok_or_else(listing_not_found)?;

        if !listing.status.is_open() {
            debug!(listing_id = %listing.id, "accept on closed listing ignored");
            return Ok(AcceptanceOutcome::AlreadyClosed);
        }

        let resolution = self
            .ledger
            .resolve_listing(&listing.id, &request.chosen)
            .await
            .map_err(map_ledger_error)?;

        match resolution {
            ListingResolution::AlreadyClosed => {
                debug!(listing_id = %listing.id, "listing closed by a concurrent accept");
                Ok(AcceptanceOutcome::AlreadyClosed)
            }
            ListingResolution::Resolved { accepted, rejected } => {
                info!(
                    listing_id = %listing.id,
                    accepted = ?accepted.as_ref().map(|offer| offer.id.to_string()),
                    rejected,
                    "listing closed"
                );
                if let Some(offer) = &accepted {
                    self.notify_winner(&listing, offer).await;
                }
                Ok(AcceptanceOutcome::Closed {
                    accepted: accepted.map(|offer| offer.id),
                    rejected,
                })
            }
        }
    }

    /// The ledger change is already committed, so failures here are logged
    /// rather than reported as a failed accept.
    async fn notify_winner(&self, listing: &ExchangeOffer, offer: &CustomerOffer) {
        if let Err(err) = self.try_notify_winner(listing, offer).await {
            error!(
                error = %err,
                listing_id = %listing.id,
                customer_offer_id = %offer.id,
                "failed to notify accepted customer"
            );
        }
    }

    async fn try_notify_winner(
        &self,
        listing: &ExchangeOffer,
        offer: &CustomerOffer,
    ) -> Result<(), Error> {
        let owner = require_user(self.users.as_ref(), &listing.owner_id).await?;
        let customer = require_user(self.users.as_ref(), &offer.customer_id).await?;
        let game = require_game(self.games.as_ref(), &listing.game_id).await?;
        let message = NotificationMessage::offer_accepted(&owner, listing.offer_type, &game.name);
        self.dispatcher.notify(&customer, message).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "acceptance_tests.rs"]
mod tests;

//! Marketplace service implementing the offer ledger driving ports.
//!
//! Listing creation, counter-offers and reads live here; accepting a
//! counter-offer is delegated to [`AcceptanceWorkflow`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use super::acceptance::AcceptanceWorkflow;
use super::lookups::{
    NameCache, listing_not_found, map_game_repository_error, map_ledger_error,
    map_user_repository_error, require_game, require_user,
};
use super::notification_dispatcher::{
    NotificationDispatcher, NotificationSettings, map_notification_repository_error,
};
use crate::domain::ports::{
    AcceptCounterOfferRequest, AcceptanceOutcome, CreateCounterOfferRequest, CreateListingRequest,
    GameRepository, ListingDetails, ListingView, MailTransport, MarketCommand, MarketQuery,
    NotificationRepository, OfferLedgerRepository, UserPage, UserRepository,
};
use crate::domain::{
    CustomerOffer, Error, ExchangeOffer, ExchangeOfferId, GameName, NotificationMessage, UserId,
};

/// Repositories the marketplace reads and writes.
pub struct MarketRepositories<L, G, U, N> {
    pub ledger: Arc<L>,
    pub games: Arc<G>,
    pub users: Arc<U>,
    pub notifications: Arc<N>,
}

/// Marketplace service backed by the offer ledger.
pub struct MarketService<L, G, U, N> {
    ledger: Arc<L>,
    games: Arc<G>,
    users: Arc<U>,
    notifications: Arc<N>,
    dispatcher: NotificationDispatcher<N>,
    acceptance: AcceptanceWorkflow<L, G, U, N>,
    clock: Arc<dyn Clock>,
}

impl<L, G, U, N> MarketService<L, G, U, N> {
    /// Create a marketplace service.
    pub fn new(
        repos: MarketRepositories<L, G, U, N>,
        mail: Arc<dyn MailTransport>,
        settings: NotificationSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let MarketRepositories {
            ledger,
            games,
            users,
            notifications,
        } = repos;
        let dispatcher = NotificationDispatcher::new(
            Arc::clone(&notifications),
            mail,
            settings,
            Arc::clone(&clock),
        );
        let acceptance = AcceptanceWorkflow::new(
            Arc::clone(&ledger),
            Arc::clone(&games),
            Arc::clone(&users),
            dispatcher.clone(),
        );
        Self {
            ledger,
            games,
            users,
            notifications,
            dispatcher,
            acceptance,
            clock,
        }
    }
}

impl<L, G, U, N> MarketService<L, G, U, N>
where
    L: OfferLedgerRepository,
    G: GameRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn notify_owner(&self, listing: &ExchangeOffer, offer: &CustomerOffer) {
        let result: Result<(), Error> = async {
            let owner = require_user(self.users.as_ref(), &listing.owner_id).await?;
            let customer = require_user(self.users.as_ref(), &offer.customer_id).await?;
            let game = require_game(self.games.as_ref(), &listing.game_id).await?;
            let message = NotificationMessage::counter_offer_received(
                &customer,
                listing.offer_type,
                &game.name,
            );
            self.dispatcher.notify(&owner, message).await?;
            Ok(())
        }
        .await;
        if let Err(err) = result {
            error!(
                error = %err,
                listing_id = %listing.id,
                customer_offer_id = %offer.id,
                "failed to notify listing owner"
            );
        }
    }

    fn names(&self) -> NameCache<'_, G, U> {
        NameCache::new(self.games.as_ref(), self.users.as_ref())
    }
}

#[async_trait]
impl<L, G, U, N> MarketCommand for MarketService<L, G, U, N>
where
    L: OfferLedgerRepository,
    G: GameRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn create_listing(&self, request: CreateListingRequest) -> Result<ExchangeOffer, Error> {
        let game = require_game(self.games.as_ref(), &request.draft.game_id).await?;
        let listing = ExchangeOffer::open(request.owner_id, request.draft, self.clock.utc());
        self.ledger
            .insert_listing(&listing)
            .await
            .map_err(map_ledger_error)?;
        info!(
            listing_id = %listing.id,
            owner_id = %listing.owner_id,
            offer_type = listing.offer_type.code(),
            game = %game.name,
            "listing opened"
        );
        Ok(listing)
    }

    async fn create_counter_offer(
        &self,
        request: CreateCounterOfferRequest,
    ) -> Result<CustomerOffer, Error> {
        let listing = self
            .ledger
            .find_listing(&request.listing_id)
            .await
            .map_err(map_ledger_error)?
            .filter(|listing| listing.status.is_open())
            .ok_or_else(listing_not_found)?;
        require_game(self.games.as_ref(), &request.draft.game_id).await?;

        let offer = CustomerOffer::pending(
            listing.id,
            request.customer_id,
            request.draft,
            self.clock.utc(),
        );
        self.ledger
            .insert_counter_offer(&offer)
            .await
            .map_err(map_ledger_error)?;
        info!(
            listing_id = %listing.id,
            customer_offer_id = %offer.id,
            customer_id = %offer.customer_id,
            "counter-offer submitted"
        );

        self.notify_owner(&listing, &offer).await;
        Ok(offer)
    }

    async fn accept_counter_offer(
        &self,
        request: AcceptCounterOfferRequest,
    ) -> Result<AcceptanceOutcome, Error> {
        self.acceptance.accept(request).await
    }
}

#[async_trait]
impl<L, G, U, N> MarketQuery for MarketService<L, G, U, N>
where
    L: OfferLedgerRepository,
    G: GameRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn list_open_listings(&self, game: Option<GameName>) -> Result<Vec<ListingView>, Error> {
        let game_id = match game {
            Some(name) => {
                let found = self
                    .games
                    .find_by_name(&name)
                    .await
                    .map_err(map_game_repository_error)?;
                match found {
                    Some(game) => Some(game.id),
                    None => return Ok(Vec::new()),
                }
            }
            None => None,
        };
        let listings = self
            .ledger
            .list_open_listings(game_id)
            .await
            .map_err(map_ledger_error)?;
        self.names().listings(listings).await
    }

    async fn latest_open_listing(&self) -> Result<Option<ListingView>, Error> {
        let latest = self
            .ledger
            .latest_open_listing()
            .await
            .map_err(map_ledger_error)?;
        match latest {
            Some(listing) => Ok(Some(self.names().listing(listing).await?)),
            None => Ok(None),
        }
    }

    async fn listing_details(
        &self,
        actor: &UserId,
        listing_id: &ExchangeOfferId,
    ) -> Result<ListingDetails, Error> {
        let listing = self
            .ledger
            .find_listing(listing_id)
            .await
            .map_err(map_ledger_error)?
            .filter(|listing| listing.is_owned_by(actor))
            .ok_or_else(listing_not_found)?;
        let offers = self
            .ledger
            .list_counter_offers(&listing.id)
            .await
            .map_err(map_ledger_error)?;

        let mut names = self.names();
        let listing = names.listing(listing).await?;
        let counter_offers = names.counter_offers(offers).await?;
        Ok(ListingDetails {
            listing,
            counter_offers,
        })
    }

    async fn user_page(&self, actor: &UserId, user_id: &UserId) -> Result<UserPage, Error> {
        if actor != user_id {
            return Err(Error::not_found("user not found"));
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .map(|account| account.user)
            .ok_or_else(|| Error::not_found("user not found"))?;
        let listings = self
            .ledger
            .list_listings_for_owner(user_id)
            .await
            .map_err(map_ledger_error)?;
        let (active, inactive): (Vec<_>, Vec<_>) = listings
            .into_iter()
            .partition(|listing| listing.status.is_open());
        let notifications = self
            .notifications
            .list_for_recipient(user_id)
            .await
            .map_err(map_notification_repository_error)?;

        let mut names = self.names();
        Ok(UserPage {
            user,
            active_offers: names.listings(active).await?,
            inactive_offers: names.listings(inactive).await?,
            notifications,
        })
    }
}

#[cfg(test)]
#[path = "market_service_tests.rs"]
mod tests;

//! Repository lookups shared by the marketplace services.

use std::collections::HashMap;

use crate::domain::ports::{
    CounterOfferView, GameRepository, GameRepositoryError, ListingView, OfferLedgerRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    CustomerOffer, Error, ExchangeOffer, Game, GameId, GameName, User, UserId, Username,
};

pub(crate) fn map_game_repository_error(error: GameRepositoryError) -> Error {
    match error {
        GameRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game repository unavailable: {message}"))
        }
        GameRepositoryError::Query { message } => {
            Error::internal(format!("game repository error: {message}"))
        }
        GameRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("game {name} already exists"))
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

pub(crate) fn map_ledger_error(error: OfferLedgerRepositoryError) -> Error {
    match error {
        OfferLedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("offer ledger unavailable: {message}"))
        }
        OfferLedgerRepositoryError::Query { message } => {
            Error::internal(format!("offer ledger error: {message}"))
        }
        OfferLedgerRepositoryError::MissingReference { message } => Error::not_found(message),
        OfferLedgerRepositoryError::ListingClosed { .. } => listing_not_found(),
    }
}

pub(crate) fn listing_not_found() -> Error {
    Error::not_found("listing not found")
}

/// Fetch a game that a request refers to; absence is the caller's fault.
pub(crate) async fn require_game<G>(games: &G, id: &GameId) -> Result<Game, Error>
where
    G: GameRepository + ?Sized,
{
    games
        .find_by_id(id)
        .await
        .map_err(map_game_repository_error)?
        .ok_or_else(|| Error::not_found(format!("game {id} not found")))
}

/// Fetch a user referenced by stored rows; absence means broken integrity.
pub(crate) async fn require_user<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_repository_error)?
        .map(|account| account.user)
        .ok_or_else(|| Error::internal(format!("user {id} referenced but missing")))
}

/// Memoises game names and usernames while decorating a batch of offers.
pub(crate) struct NameCache<'a, G: ?Sized, U: ?Sized> {
    games: &'a G,
    users: &'a U,
    game_names: HashMap<GameId, GameName>,
    usernames: HashMap<UserId, Username>,
}

impl<'a, G, U> NameCache<'a, G, U>
where
    G: GameRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub(crate) fn new(games: &'a G, users: &'a U) -> Self {
        Self {
            games,
            users,
            game_names: HashMap::new(),
            usernames: HashMap::new(),
        }
    }

    async fn game_name(&mut self, id: GameId) -> Result<GameName, Error> {
        if let Some(name) = self.game_names.get(&id) {
            return Ok(name.clone());
        }
        let game = self
            .games
            .find_by_id(&id)
            .await
            .map_err(map_game_repository_error)?
            .ok_or_else(|| Error::internal(format!("game {id} referenced but missing")))?;
        self.game_names.insert(id, game.name.clone());
        Ok(game.name)
    }

    async fn username(&mut self, id: UserId) -> Result<Username, Error> {
        if let Some(name) = self.usernames.get(&id) {
            return Ok(name.clone());
        }
        let user = require_user(self.users, &id).await?;
        self.usernames.insert(id, user.username.clone());
        Ok(user.username)
    }

    pub(crate) async fn listing(&mut self, listing: ExchangeOffer) -> Result<ListingView, Error> {
        let game_name = self.game_name(listing.game_id).await?;
        let owner_username = self.username(listing.owner_id).await?;
        Ok(ListingView {
            listing,
            game_name,
            owner_username,
        })
    }

    pub(crate) async fn listings(
        &mut self,
        listings: Vec<ExchangeOffer>,
    ) -> Result<Vec<ListingView>, Error> {
        let mut views = Vec::with_capacity(listings.len());
        for listing in listings {
            views.push(self.listing(listing).await?);
        }
        Ok(views)
    }

    pub(crate) async fn counter_offers(
        &mut self,
        offers: Vec<CustomerOffer>,
    ) -> Result<Vec<CounterOfferView>, Error> {
        let mut views = Vec::with_capacity(offers.len());
        for offer in offers {
            let game_name = self.game_name(offer.game_id).await?;
            let customer_username = self.username(offer.customer_id).await?;
            views.push(CounterOfferView {
                offer,
                game_name,
                customer_username,
            });
        }
        Ok(views)
    }
}

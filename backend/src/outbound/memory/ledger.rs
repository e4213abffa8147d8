//! Offer ledger over [`InMemoryStore`].

use async_trait::async_trait;

use super::{InMemoryStore, Poisoned, Tables, newest_first};
use crate::domain::ports::{ListingResolution, OfferLedgerRepository, OfferLedgerRepositoryError};
use crate::domain::{
    CounterOfferStatus, CustomerOffer, CustomerOfferId, ExchangeOffer, ExchangeOfferId, GameId,
    ListingStatus, UserId,
};

impl From<Poisoned> for OfferLedgerRepositoryError {
    fn from(value: Poisoned) -> Self {
        Self::query(value.message())
    }
}

fn check_references(
    tables: &Tables,
    user: &UserId,
    game: &GameId,
) -> Result<(), OfferLedgerRepositoryError> {
    if !tables.users.iter().any(|a| &a.user.id == user) {
        return Err(OfferLedgerRepositoryError::missing_reference(format!(
            "user {user}"
        )));
    }
    if !tables.games.iter().any(|g| &g.id == game) {
        return Err(OfferLedgerRepositoryError::missing_reference(format!(
            "game {game}"
        )));
    }
    Ok(())
}

/// Accept `chosen` and reject every other pending counter-offer on
/// `listing`. Offers already resolved keep their status.
fn settle_counter_offers(
    offers: &mut [CustomerOffer],
    listing: &ExchangeOfferId,
    chosen: &CustomerOfferId,
) -> (Option<CustomerOffer>, usize) {
    let mut accepted = None;
    let mut rejected = 0;
    for offer in offers
        .iter_mut()
        .filter(|o| &o.exchange_offer_id == listing)
    {
        let is_chosen = &offer.id == chosen;
        let Ok(next) = offer.status.resolve(is_chosen) else {
            continue;
        };
        offer.status = next;
        match next {
            CounterOfferStatus::Accepted => accepted = Some(offer.clone()),
            CounterOfferStatus::Rejected => rejected += 1,
            CounterOfferStatus::Pending => {}
        }
    }
    (accepted, rejected)
}

#[async_trait]
impl OfferLedgerRepository for InMemoryStore {
    async fn insert_listing(
        &self,
        listing: &ExchangeOffer,
    ) -> Result<(), OfferLedgerRepositoryError> {
        let mut tables = self.lock()?;
        check_references(&tables, &listing.owner_id, &listing.game_id)?;
        tables.listings.push(listing.clone());
        Ok(())
    }

    async fn find_listing(
        &self,
        id: &ExchangeOfferId,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.listings.iter().find(|l| &l.id == id).cloned())
    }

    async fn list_open_listings(
        &self,
        game: Option<GameId>,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError> {
        let tables = self.lock()?;
        let open: Vec<&ExchangeOffer> = tables
            .listings
            .iter()
            .filter(|l| l.status.is_open())
            .filter(|l| game.is_none_or(|g| l.game_id == g))
            .collect();
        Ok(newest_first(open.into_iter(), |l| l.created_at))
    }

    async fn latest_open_listing(
        &self,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError> {
        Ok(self.list_open_listings(None).await?.into_iter().next())
    }

    async fn list_listings_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError> {
        let tables = self.lock()?;
        let owned: Vec<&ExchangeOffer> = tables
            .listings
            .iter()
            .filter(|l| l.is_owned_by(owner))
            .collect();
        Ok(newest_first(owned.into_iter(), |l| l.created_at))
    }

    async fn insert_counter_offer(
        &self,
        offer: &CustomerOffer,
    ) -> Result<(), OfferLedgerRepositoryError> {
        let mut tables = self.lock()?;
        let Some(listing) = tables
            .listings
            .iter()
            .find(|l| l.id == offer.exchange_offer_id)
        else {
            return Err(OfferLedgerRepositoryError::missing_reference(format!(
                "listing {}",
                offer.exchange_offer_id
            )));
        };
        if !listing.status.is_open() {
            return Err(OfferLedgerRepositoryError::listing_closed(
                listing.id.to_string(),
            ));
        }
        check_references(&tables, &offer.customer_id, &offer.game_id)?;
        tables.counter_offers.push(offer.clone());
        Ok(())
    }

    async fn list_counter_offers(
        &self,
        listing: &ExchangeOfferId,
    ) -> Result<Vec<CustomerOffer>, OfferLedgerRepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .counter_offers
            .iter()
            .filter(|o| &o.exchange_offer_id == listing)
            .cloned()
            .collect())
    }

    async fn resolve_listing(
        &self,
        listing: &ExchangeOfferId,
        chosen: &CustomerOfferId,
    ) -> Result<ListingResolution, OfferLedgerRepositoryError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        let Some(target) = tables
            .listings
            .iter_mut()
            .find(|l| &l.id == listing && l.status.is_open())
        else {
            return Ok(ListingResolution::AlreadyClosed);
        };
        target.status = ListingStatus::Closed;
        let (accepted, rejected) =
            settle_counter_offers(&mut tables.counter_offers, listing, chosen);
        Ok(ListingResolution::Resolved { accepted, rejected })
    }
}

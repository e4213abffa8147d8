//! PostgreSQL-backed offer ledger.
//!
//! Resolving a listing runs in one transaction whose first statement is a
//! conditional `UPDATE … WHERE is_open`, so of two racing accepts exactly one
//! sees a row change and goes on to settle the counter-offers. Recording a
//! counter-offer takes the same row lock with `SELECT … FOR UPDATE` first, so
//! it either lands before the listing closes or sees it closed.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use super::error_mapping::DbFailure;
use super::models::{CustomerOfferRow, ExchangeOfferRow, convert_rows};
use super::pool::DbPool;
use super::schema::{customer_offers, exchange_offers};
use crate::domain::ports::{
    ListingResolution, OfferLedgerRepository, OfferLedgerRepositoryError,
};
use crate::domain::{
    CounterOfferStatus, CustomerOffer, CustomerOfferId, ExchangeOffer, ExchangeOfferId, GameId,
    UserId,
};

#[derive(Clone)]
pub struct DieselOfferLedgerRepository {
    pool: DbPool,
}

impl DieselOfferLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_listings(
        &self,
        query: exchange_offers::BoxedQuery<'_, diesel::pg::Pg>,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<ExchangeOfferRow> = query
                .select(ExchangeOfferRow::as_select())
                .load(&mut conn)
                .await?;
            Ok::<_, DbFailure>(convert_rows::<_, ExchangeOffer>(rows)?)
        };
        run.await.map_err(map_failure)
    }
}

fn map_failure(failure: DbFailure) -> OfferLedgerRepositoryError {
    match failure {
        DbFailure::ForeignKeyViolation { constraint } => {
            OfferLedgerRepositoryError::missing_reference(
                constraint.unwrap_or_else(|| "unknown constraint".to_owned()),
            )
        }
        other => other.into_port_error(
            OfferLedgerRepositoryError::connection,
            OfferLedgerRepositoryError::query,
        ),
    }
}

/// Counter-offers of `listing` in the order they were recorded.
fn counter_offers_in_insertion_order(
    listing: Uuid,
) -> customer_offers::BoxedQuery<'static, Pg> {
    customer_offers::table
        .filter(customer_offers::exchange_offer_id.eq(listing))
        .order_by(customer_offers::seq.asc())
        .into_boxed()
}

/// What happened to a counter-offer submitted for a locked listing row.
enum Admission {
    Recorded,
    ListingMissing,
    ListingClosed,
}

/// Settle counter-offers for a listing that this transaction just closed.
async fn settle_counter_offers(
    conn: &mut diesel_async::AsyncPgConnection,
    listing: Uuid,
    chosen: Uuid,
) -> Result<(Option<CustomerOfferRow>, usize), diesel::result::Error> {
    let pending = CounterOfferStatus::Pending.code();
    let rejected = diesel::update(
        customer_offers::table
            .filter(customer_offers::exchange_offer_id.eq(listing))
            .filter(customer_offers::id.ne(chosen))
            .filter(customer_offers::status.eq(pending)),
    )
    .set(customer_offers::status.eq(CounterOfferStatus::Rejected.code()))
    .execute(conn)
    .await?;
    let accepted = diesel::update(
        customer_offers::table
            .filter(customer_offers::id.eq(chosen))
            .filter(customer_offers::exchange_offer_id.eq(listing))
            .filter(customer_offers::status.eq(pending)),
    )
    .set(customer_offers::status.eq(CounterOfferStatus::Accepted.code()))
    .returning(CustomerOfferRow::as_returning())
    .get_result(conn)
    .await
    .optional()?;
    Ok((accepted, rejected))
}

#[async_trait]
impl OfferLedgerRepository for DieselOfferLedgerRepository {
    async fn insert_listing(
        &self,
        listing: &ExchangeOffer,
    ) -> Result<(), OfferLedgerRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(exchange_offers::table)
                .values(ExchangeOfferRow::from(listing))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(())
        };
        run.await.map_err(map_failure)
    }

    async fn find_listing(
        &self,
        id: &ExchangeOfferId,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError> {
        let query = exchange_offers::table
            .filter(exchange_offers::id.eq(*id.as_uuid()))
            .into_boxed();
        Ok(self.load_listings(query).await?.into_iter().next())
    }

    async fn list_open_listings(
        &self,
        game: Option<GameId>,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError> {
        let mut query = exchange_offers::table
            .filter(exchange_offers::is_open.eq(true))
            .order_by(exchange_offers::created_at.desc())
            .into_boxed();
        if let Some(game_id) = game {
            query = query.filter(exchange_offers::game_id.eq(*game_id.as_uuid()));
        }
        self.load_listings(query).await
    }

    async fn latest_open_listing(
        &self,
    ) -> Result<Option<ExchangeOffer>, OfferLedgerRepositoryError> {
        let query = exchange_offers::table
            .filter(exchange_offers::is_open.eq(true))
            .order_by(exchange_offers::created_at.desc())
            .limit(1)
            .into_boxed();
        Ok(self.load_listings(query).await?.into_iter().next())
    }

    async fn list_listings_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<ExchangeOffer>, OfferLedgerRepositoryError> {
        let query = exchange_offers::table
            .filter(exchange_offers::owner_id.eq(*owner.as_uuid()))
            .order_by(exchange_offers::created_at.desc())
            .into_boxed();
        self.load_listings(query).await
    }

    async fn insert_counter_offer(
        &self,
        offer: &CustomerOffer,
    ) -> Result<(), OfferLedgerRepositoryError> {
        let listing_id = *offer.exchange_offer_id.as_uuid();
        let row = CustomerOfferRow::from(offer);
        let run = async {
            let mut conn = self.pool.get().await?;
            let admission = conn
                .transaction::<_, diesel::result::Error, _>(|conn| {
                    async move {
                        let is_open: Option<bool> = exchange_offers::table
                            .filter(exchange_offers::id.eq(listing_id))
                            .select(exchange_offers::is_open)
                            .for_update()
                            .get_result(conn)
                            .await
                            .optional()?;
                        match is_open {
                            None => Ok(Admission::ListingMissing),
                            Some(false) => Ok(Admission::ListingClosed),
                            Some(true) => {
                                diesel::insert_into(customer_offers::table)
                                    .values(row)
                                    .execute(conn)
                                    .await?;
                                Ok(Admission::Recorded)
                            }
                        }
                    }
                    .scope_boxed()
                })
                .await?;
            Ok::<_, DbFailure>(admission)
        };
        match run.await.map_err(map_failure)? {
            Admission::Recorded => Ok(()),
            Admission::ListingMissing => Err(OfferLedgerRepositoryError::missing_reference(
                format!("listing {listing_id}"),
            )),
            Admission::ListingClosed => {
                debug!(listing_id = %listing_id, "counter-offer refused for closed listing");
                Err(OfferLedgerRepositoryError::listing_closed(listing_id.to_string()))
            }
        }
    }

    async fn list_counter_offers(
        &self,
        listing: &ExchangeOfferId,
    ) -> Result<Vec<CustomerOffer>, OfferLedgerRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<CustomerOfferRow> =
                counter_offers_in_insertion_order(*listing.as_uuid())
                    .select(CustomerOfferRow::as_select())
                    .load(&mut conn)
                    .await?;
            Ok::<_, DbFailure>(convert_rows::<_, CustomerOffer>(rows)?)
        };
        run.await.map_err(map_failure)
    }

    async fn resolve_listing(
        &self,
        listing: &ExchangeOfferId,
        chosen: &CustomerOfferId,
    ) -> Result<ListingResolution, OfferLedgerRepositoryError> {
        let listing_id = *listing.as_uuid();
        let chosen_id = *chosen.as_uuid();
        let run = async {
            let mut conn = self.pool.get().await?;
            let settled = conn
                .transaction::<_, diesel::result::Error, _>(|conn| {
                    async move {
                        let closed = diesel::update(
                            exchange_offers::table
                                .filter(exchange_offers::id.eq(listing_id))
                                .filter(exchange_offers::is_open.eq(true)),
                        )
                        .set(exchange_offers::is_open.eq(false))
                        .execute(conn)
                        .await?;
                        if closed == 0 {
                            return Ok(None);
                        }
                        settle_counter_offers(conn, listing_id, chosen_id)
                            .await
                            .map(Some)
                    }
                    .scope_boxed()
                })
                .await?;
            Ok::<_, DbFailure>(settled)
        };
        let Some((accepted, rejected)) = run.await.map_err(map_failure)? else {
            debug!(listing_id = %listing, "listing already closed");
            return Ok(ListingResolution::AlreadyClosed);
        };
        let accepted = accepted
            .map(CustomerOffer::try_from)
            .transpose()
            .map_err(|err| map_failure(err.into()))?;
        Ok(ListingResolution::Resolved { accepted, rejected })
    }
}

//! Marketplace handlers: listings, counter-offers and acceptance.
//!
//! ```text
//! GET  /api/v1/market?game=Game%201
//! POST /api/v1/market/offers {"offerType":"sell","gameId":"…","price":"25.00","description":"…"}
//! GET  /api/v1/market/offers/{id}
//! POST /api/v1/market/offers/{id}/counter-offers {"gameId":"…","price":20,"description":"…"}
//! POST /api/v1/market/offers/{id}/accept {"counterOfferId":"…"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    AcceptCounterOfferRequest, AcceptanceOutcome, CreateCounterOfferRequest,
    CreateListingRequest, ListingDetails,
};
use crate::domain::{
    CounterOfferDraft, CustomerOfferId, Error, ExchangeOfferId, GameId, GameName, ListingDraft,
    OfferDescription, OfferType, Price,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CounterOfferResponse, ListingResponse, collect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_offer_error, parse_id, parse_path_id};

/// Prices may be sent as JSON strings or numbers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    fn parse(&self) -> Result<Price, Error> {
        let parsed = match self {
            Self::Text(text) => text.parse(),
            Self::Number(number) => number.to_string().parse(),
        };
        parsed.map_err(map_offer_error)
    }
}

fn parse_price(input: Option<&PriceInput>) -> Result<Option<Price>, Error> {
    match input {
        Some(PriceInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => value.parse().map(Some),
        None => Ok(None),
    }
}

/// Query string for `GET /api/v1/market`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MarketQueryParams {
    /// Exact game name to filter by.
    pub game: Option<String>,
}

/// Body for `POST /api/v1/market/offers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingBody {
    #[schema(example = "sell")]
    pub offer_type: String,
    pub game_id: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub price: Option<PriceInput>,
    pub description: String,
}

/// Body for `POST /api/v1/market/offers/{id}/counter-offers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCounterOfferBody {
    pub game_id: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "20.00")]
    pub price: Option<PriceInput>,
    pub description: String,
}

/// Body for `POST /api/v1/market/offers/{id}/accept`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBody {
    pub counter_offer_id: String,
}

/// A listing together with every counter-offer made against it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetailsResponse {
    pub listing: ListingResponse,
    pub counter_offers: Vec<CounterOfferResponse>,
}

impl From<ListingDetails> for ListingDetailsResponse {
    fn from(details: ListingDetails) -> Self {
        Self {
            listing: details.listing.into(),
            counter_offers: collect(details.counter_offers),
        }
    }
}

/// Result of an acceptance attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    /// `closed` when this call closed the listing, `already_closed` otherwise.
    #[schema(example = "closed")]
    pub outcome: String,
    pub accepted_offer_id: Option<Uuid>,
    pub rejected: usize,
}

impl From<AcceptanceOutcome> for AcceptResponse {
    fn from(outcome: AcceptanceOutcome) -> Self {
        match outcome {
            AcceptanceOutcome::AlreadyClosed => Self {
                outcome: "already_closed".to_owned(),
                accepted_offer_id: None,
                rejected: 0,
            },
            AcceptanceOutcome::Closed { accepted, rejected } => Self {
                outcome: "closed".to_owned(),
                accepted_offer_id: accepted.map(Into::into),
                rejected,
            },
        }
    }
}

/// Open listings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/market",
    params(MarketQueryParams),
    responses(
        (status = 200, description = "Open listings", body = [ListingResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["market"],
    operation_id = "listMarket",
    security([])
)]
#[get("/market")]
pub async fn list_market(
    state: web::Data<HttpState>,
    query: web::Query<MarketQueryParams>,
) -> ApiResult<web::Json<Vec<ListingResponse>>> {
    let filter = match query.into_inner().game {
        Some(name) if !name.trim().is_empty() => match GameName::new(name) {
            Ok(name) => Some(name),
            // No game can carry an invalid name, so nothing matches.
            Err(_) => return Ok(web::Json(Vec::new())),
        },
        _ => None,
    };
    let listings = state.market_query.list_open_listings(filter).await?;
    Ok(web::Json(collect(listings)))
}

/// Publish a listing.
#[utoipa::path(
    post,
    path = "/api/v1/market/offers",
    request_body = CreateListingBody,
    responses(
        (status = 201, description = "Listing created; body carries `id` and `isOpen`"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown game", body = Error)
    ),
    tags = ["market"],
    operation_id = "createListing"
)]
#[post("/market/offers")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateListingBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let body = payload.into_inner();
    let offer_type: OfferType = body.offer_type.parse().map_err(map_offer_error)?;
    let game_id: GameId = parse_id(&body.game_id, FieldName::new("gameId"))?;
    let price = parse_price(body.price.as_ref())?;
    let description = OfferDescription::new(body.description).map_err(map_offer_error)?;
    let draft =
        ListingDraft::new(offer_type, game_id, price, description).map_err(map_offer_error)?;
    let listing = state
        .market
        .create_listing(CreateListingRequest { owner_id, draft })
        .await?;
    info!(listing_id = %listing.id, "listing created");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": Uuid::from(listing.id),
        "isOpen": listing.status.is_open(),
    })))
}

/// Listing details, visible to the owner only.
#[utoipa::path(
    get,
    path = "/api/v1/market/offers/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing with counter-offers", body = ListingDetailsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found or not the owner", body = Error)
    ),
    tags = ["market"],
    operation_id = "listingDetails"
)]
#[get("/market/offers/{id}")]
pub async fn listing_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingDetailsResponse>> {
    let actor = session.require_user_id()?;
    let listing_id: ExchangeOfferId = parse_path_id(&path.into_inner(), "listing")?;
    let details = state.market_query.listing_details(&actor, &listing_id).await?;
    Ok(web::Json(details.into()))
}

/// Make a counter-offer on an open listing.
#[utoipa::path(
    post,
    path = "/api/v1/market/offers/{id}/counter-offers",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = CreateCounterOfferBody,
    responses(
        (status = 201, description = "Counter-offer created"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Listing missing or closed", body = Error)
    ),
    tags = ["market"],
    operation_id = "createCounterOffer"
)]
#[post("/market/offers/{id}/counter-offers")]
pub async fn create_counter_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateCounterOfferBody>,
) -> ApiResult<HttpResponse> {
    let customer_id = session.require_user_id()?;
    let listing_id: ExchangeOfferId = parse_path_id(&path.into_inner(), "listing")?;
    let body = payload.into_inner();
    let draft = CounterOfferDraft {
        game_id: parse_id(&body.game_id, FieldName::new("gameId"))?,
        price: parse_price(body.price.as_ref())?,
        description: OfferDescription::new(body.description).map_err(map_offer_error)?,
    };
    let offer = state
        .market
        .create_counter_offer(CreateCounterOfferRequest {
            listing_id,
            customer_id,
            draft,
        })
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": Uuid::from(offer.id),
        "status": offer.status.code(),
    })))
}

/// Accept a counter-offer and close the listing.
#[utoipa::path(
    post,
    path = "/api/v1/market/offers/{id}/accept",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = AcceptBody,
    responses(
        (status = 200, description = "Acceptance outcome", body = AcceptResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found or not the owner", body = Error)
    ),
    tags = ["market"],
    operation_id = "acceptCounterOffer"
)]
#[post("/market/offers/{id}/accept")]
pub async fn accept_counter_offer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AcceptBody>,
) -> ApiResult<web::Json<AcceptResponse>> {
    let actor = session.require_user_id()?;
    let listing_id: ExchangeOfferId = parse_path_id(&path.into_inner(), "listing")?;
    let chosen: CustomerOfferId =
        parse_id(&payload.counter_offer_id, FieldName::new("counterOfferId"))?;
    let outcome = state
        .market
        .accept_counter_offer(AcceptCounterOfferRequest {
            actor,
            listing_id,
            chosen,
        })
        .await?;
    Ok(web::Json(outcome.into()))
}

//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes and
//! the JSON bodies they exchange, plus the session cookie security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it for
//! external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::inbound::http::catalogue::{CreateArticleRequest, CreateGameRequest};
use crate::inbound::http::dto::{
    ArticleResponse, CounterOfferResponse, GameResponse, ListingResponse, NotificationResponse,
    UserResponse,
};
use crate::inbound::http::front_page::FrontPageResponse;
use crate::inbound::http::market::{
    AcceptBody, AcceptResponse, CreateCounterOfferBody, CreateListingBody, ListingDetailsResponse,
};
use crate::inbound::http::subscriptions::SubscribeRequest;
use crate::inbound::http::users::UserPageResponse;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "GameConnect API",
        description = "Game marketplace: listings, counter-offers, catalogue and notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::change_password,
        crate::inbound::http::users::user_page,
        crate::inbound::http::users::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::front_page::front_page,
        crate::inbound::http::catalogue::list_games,
        crate::inbound::http::catalogue::create_game,
        crate::inbound::http::catalogue::list_articles,
        crate::inbound::http::catalogue::create_article,
        crate::inbound::http::catalogue::get_article,
        crate::inbound::http::market::list_market,
        crate::inbound::http::market::create_listing,
        crate::inbound::http::market::listing_details,
        crate::inbound::http::market::create_counter_offer,
        crate::inbound::http::market::accept_counter_offer,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserResponse,
        GameResponse,
        ArticleResponse,
        ListingResponse,
        CounterOfferResponse,
        NotificationResponse,
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        UserPageResponse,
        CreateGameRequest,
        CreateArticleRequest,
        FrontPageResponse,
        CreateListingBody,
        CreateCounterOfferBody,
        AcceptBody,
        AcceptResponse,
        ListingDetailsResponse,
        SubscribeRequest,
    )),
    tags(
        (name = "accounts", description = "Sign-up, login and password management"),
        (name = "users", description = "User pages and notification inboxes"),
        (name = "notifications", description = "Notification state changes"),
        (name = "catalogue", description = "Games and editorial articles"),
        (name = "market", description = "Listings, counter-offers and acceptance"),
        (name = "subscriptions", description = "Newsletter mailing list"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        schemas
            .iter()
            .find(|(key, _)| key.rsplit('.').next() == Some(name))
            .map(|(_, schema)| schema)
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let error = schema(&doc, "Error");
        assert_has_field(error, "code");
        assert_has_field(error, "message");
    }

    #[test]
    fn listing_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let listing = schema(&doc, "ListingResponse");
        assert_has_field(listing, "offerType");
        assert_has_field(listing, "isOpen");
    }

    #[test]
    fn every_market_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/market",
            "/api/v1/market/offers",
            "/api/v1/market/offers/{id}",
            "/api/v1/market/offers/{id}/counter-offers",
            "/api/v1/market/offers/{id}/accept",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

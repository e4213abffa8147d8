//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};

use crate::domain::ports::{
    MockAccountCommand, MockCatalogueCommand, MockCatalogueQuery, MockFrontPageQuery,
    MockLoginService, MockMarketCommand, MockMarketQuery, MockNotificationCommand,
    MockNotificationQuery, MockSubscriptionCommand, MockUserDirectory,
};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag so
/// cookies survive plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port; set expectations, then call [`Self::into_state`].
pub struct TestPorts {
    pub login: MockLoginService,
    pub accounts: MockAccountCommand,
    pub users: MockUserDirectory,
    pub market: MockMarketCommand,
    pub market_query: MockMarketQuery,
    pub notifications: MockNotificationCommand,
    pub notifications_query: MockNotificationQuery,
    pub catalogue: MockCatalogueCommand,
    pub catalogue_query: MockCatalogueQuery,
    pub front_page: MockFrontPageQuery,
    pub subscriptions: MockSubscriptionCommand,
}

impl TestPorts {
    pub fn new() -> Self {
        Self {
            login: MockLoginService::new(),
            accounts: MockAccountCommand::new(),
            users: MockUserDirectory::new(),
            market: MockMarketCommand::new(),
            market_query: MockMarketQuery::new(),
            notifications: MockNotificationCommand::new(),
            notifications_query: MockNotificationQuery::new(),
            catalogue: MockCatalogueCommand::new(),
            catalogue_query: MockCatalogueQuery::new(),
            front_page: MockFrontPageQuery::new(),
            subscriptions: MockSubscriptionCommand::new(),
        }
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            market: Arc::new(self.market),
            market_query: Arc::new(self.market_query),
            notifications: Arc::new(self.notifications),
            notifications_query: Arc::new(self.notifications_query),
            catalogue: Arc::new(self.catalogue),
            catalogue_query: Arc::new(self.catalogue_query),
            front_page: Arc::new(self.front_page),
            subscriptions: Arc::new(self.subscriptions),
        }
    }
}

/// Application exposing every `/api/v1` route over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(crate::inbound::http::configure),
    )
}

/// Log in through `POST /api/v1/login` and return the session cookie.
///
/// The caller must have primed `TestPorts::login` to accept the attempt.
pub async fn sign_in<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({"username": "u1", "password": "hunter22"}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

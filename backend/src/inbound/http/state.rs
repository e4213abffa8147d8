//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only ever see domain
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CatalogueCommand, CatalogueQuery, FrontPageQuery, LoginService, MarketCommand,
    MarketQuery, NotificationCommand, NotificationQuery, SubscriptionCommand, UserDirectory,
};

/// Dependency bundle for HTTP handlers.
///
/// Built once at start-up by `wiring::build_http_state` and cloned into each
/// Actix worker.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UserDirectory>,
    pub market: Arc<dyn MarketCommand>,
    pub market_query: Arc<dyn MarketQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub front_page: Arc<dyn FrontPageQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
}

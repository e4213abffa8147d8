//! HTTP inbound adapter exposing the JSON API.
//!
//! Handlers translate requests into calls on the driving ports held by
//! [`state::HttpState`] and never touch persistence directly.

use actix_web::web;

use crate::domain::Error;

pub mod accounts;
pub mod catalogue;
pub mod dto;
pub mod error;
pub mod front_page;
pub mod guards;
pub mod health;
pub mod market;
pub mod notifications;
pub mod session;
pub mod session_config;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every handler served under `/api/v1`.
///
/// Malformed JSON bodies and query strings are reported with the same error
/// envelope as every other validation failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed request body: {err}")).into()
    }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            Error::invalid_request(format!("malformed query string: {err}")).into()
        }))
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::change_password)
        .service(users::user_page)
        .service(users::list_notifications)
        .service(notifications::mark_read)
        .service(notifications::delete_notification)
        .service(front_page::front_page)
        .service(catalogue::list_games)
        .service(catalogue::create_game)
        .service(catalogue::list_articles)
        .service(catalogue::create_article)
        .service(catalogue::get_article)
        .service(market::list_market)
        .service(market::create_listing)
        .service(market::listing_details)
        .service(market::create_counter_offer)
        .service(market::accept_counter_offer)
        .service(subscriptions::subscribe);
}

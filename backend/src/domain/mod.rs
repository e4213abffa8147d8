//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed marketplace model (users, games,
//! articles, listings, counter-offers and notifications) together with the
//! services that implement the driving ports in [`ports`]. Nothing here
//! depends on Actix, Diesel or HTTP clients; adapters live under
//! `inbound` and `outbound`.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - Value types such as `Username`, `GameName`, `Price` and `ArticleSlug`
//!   that validate on construction.
//! - Services (`AccountService`, `MarketService`, `CatalogueService`, …)
//!   generic over the driven repository ports.

mod acceptance;
mod account_service;
pub mod auth;
pub mod catalogue;
mod catalogue_service;
pub mod error;
mod front_page_service;
pub(crate) mod identifier;
mod lookups;
mod market_service;
pub mod notification;
mod notification_dispatcher;
mod notification_service;
pub mod offer;
pub mod ports;
pub mod slug;
mod subscription_service;
pub mod trace_id;
pub mod user;

pub use self::acceptance::AcceptanceWorkflow;
pub use self::account_service::{AccountService, StaffBootstrap};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, NewPassword, PASSWORD_MIN, PasswordChange,
    Registration,
};
pub use self::catalogue::{
    ARTICLE_TITLE_MAX, Article, CatalogueValidationError, GAME_NAME_MAX, Game, GameId, GameName,
    NewArticle, NewGame,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::front_page_service::FrontPageService;
pub use self::market_service::{MarketRepositories, MarketService};
pub use self::notification::{
    Notification, NotificationId, NotificationMessage, OutboundEmail, listing_label,
};
pub use self::notification_dispatcher::{NotificationDispatcher, NotificationSettings};
pub use self::notification_service::NotificationService;
pub use self::offer::{
    CounterOfferDraft, CounterOfferStatus, CustomerOffer, CustomerOfferId, DESCRIPTION_MAX,
    ExchangeOffer, ExchangeOfferId, ListingDraft, ListingStatus, OfferDescription,
    OfferValidationError, OfferType, PRICE_DECIMAL_PLACES, PRICE_MAX_DIGITS, Price,
    TransitionError,
};
pub use self::slug::{ArticleSlug, SlugValidationError};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Capability, EMAIL_MAX, EmailAddress, PasswordDigest, USERNAME_MAX, User, UserAccount, UserId,
    UserValidationError, Username,
};


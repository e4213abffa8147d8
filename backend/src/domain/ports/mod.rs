//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, `LoginService`, `UserDirectory`) are
//! called by inbound adapters. Driven ports (`*Repository`, `PasswordHasher`,
//! `MailTransport`, `MailingList`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod article_repository;
mod catalogue_command;
mod catalogue_query;
mod front_page_query;
mod game_repository;
mod login_service;
mod mail_transport;
mod mailing_list;
mod market_command;
mod market_query;
mod notification_command;
mod notification_repository;
mod offer_ledger_repository;
mod password_hasher;
mod subscription_command;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::CatalogueCommand;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use front_page_query::MockFrontPageQuery;
pub use front_page_query::{FrontPage, FrontPageQuery};
#[cfg(test)]
pub use game_repository::MockGameRepository;
pub use game_repository::{GameRepository, GameRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use mail_transport::{MailTransport, MailTransportError};
#[cfg(test)]
pub use mailing_list::MockMailingList;
pub use mailing_list::{MailingList, MailingListError};
#[cfg(test)]
pub use market_command::MockMarketCommand;
pub use market_command::{
    AcceptCounterOfferRequest, AcceptanceOutcome, CreateCounterOfferRequest, CreateListingRequest,
    MarketCommand,
};
#[cfg(test)]
pub use market_query::MockMarketQuery;
pub use market_query::{CounterOfferView, ListingDetails, ListingView, MarketQuery, UserPage};
#[cfg(test)]
pub use notification_command::{MockNotificationCommand, MockNotificationQuery};
pub use notification_command::{NotificationCommand, NotificationQuery};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use offer_ledger_repository::MockOfferLedgerRepository;
pub use offer_ledger_repository::{
    ListingResolution, OfferLedgerRepository, OfferLedgerRepositoryError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use subscription_command::MockSubscriptionCommand;
pub use subscription_command::SubscriptionCommand;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

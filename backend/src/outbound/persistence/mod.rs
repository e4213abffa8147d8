//! PostgreSQL adapters for the driven repository ports.
//!
//! Row structs and the Diesel schema stay private to this module; only the
//! repositories, the pool and the migration runner are exported.

mod diesel_catalogue_repository;
mod diesel_notification_repository;
mod diesel_offer_ledger_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::{DieselArticleRepository, DieselGameRepository};
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_offer_ledger_repository::DieselOfferLedgerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

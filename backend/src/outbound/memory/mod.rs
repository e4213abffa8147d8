//! Process-local repositories backed by a single mutex-guarded store.
//!
//! Used when no `DATABASE_URL` is configured and by the integration tests.
//! One lock covers every table so that listing resolution is atomic with
//! respect to concurrent counter-offers, mirroring the transaction the
//! Diesel adapter runs.

mod ledger;
mod repositories;

use std::sync::{Mutex, MutexGuard};

use crate::domain::{Article, CustomerOffer, ExchangeOffer, Game, Notification, UserAccount};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Vec<UserAccount>,
    pub(crate) games: Vec<Game>,
    pub(crate) articles: Vec<Article>,
    pub(crate) listings: Vec<ExchangeOffer>,
    pub(crate) counter_offers: Vec<CustomerOffer>,
    pub(crate) notifications: Vec<Notification>,
}

/// Shared in-memory store implementing every repository port.
///
/// Cloning is not supported; share it behind an `Arc` and coerce to each
/// `Arc<dyn Port>` as needed.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

/// The store's mutex was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Poisoned;

impl Poisoned {
    pub(crate) fn message(self) -> String {
        "in-memory store lock poisoned".to_owned()
    }
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Tables>, Poisoned> {
        self.tables.lock().map_err(|_| Poisoned)
    }
}

/// Newest-first ordering that keeps later insertions ahead on equal
/// timestamps.
pub(crate) fn newest_first<'a, T, I, F>(items: I, created_at: F) -> Vec<T>
where
    T: Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut out: Vec<T> = items.rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

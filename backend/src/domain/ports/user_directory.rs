//! Driving port for resolving session user ids into users.
//!
//! Guards use it to turn an authenticated id into a [`User`] whose
//! capabilities can be checked.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for user lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user; `Ok(None)` when the account no longer exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}

//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to check credentials without knowing how
//! accounts are stored, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

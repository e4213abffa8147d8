//! Driving port for account lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{Error, PasswordChange, Registration, User, UserId};

/// Domain use-case port for registration and password changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a regular (non-staff) account.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Replace the actor's password after verifying the current one.
    async fn change_password(&self, actor: &UserId, change: PasswordChange) -> Result<(), Error>;
}

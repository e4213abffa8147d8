//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{PasswordDigest, UserAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already held by another account.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

/// Port for storing accounts and their credential hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; the username must be unused.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Fetch an account by its exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Replace the stored password hash.
    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError>;
}

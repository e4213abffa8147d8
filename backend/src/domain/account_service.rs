//! Account services: login, registration, password changes and lookups.
//!
//! [`AccountService`] implements the `LoginService`, `AccountCommand` and
//! `UserDirectory` driving ports on top of a [`UserRepository`] and a
//! [`PasswordHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, LoginService, PasswordHasher, PasswordHasherError, UserDirectory,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, NewPassword, PasswordChange, Registration, User,
    UserAccount, UserId, Username,
};

fn username_taken(username: &str) -> Error {
    Error::invalid_request(format!("username {username} is already taken")).with_details(json!({
        "field": "username",
        "code": "username_taken",
    }))
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { username } => username_taken(&username),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Outcome of [`AccountService::ensure_staff_account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffBootstrap {
    /// A new staff account was created.
    Created(UserId),
    /// An account with the username already existed and was left untouched.
    AlreadyPresent(UserId),
}

/// Account service backed by a user repository.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Create a new account service.
    pub fn new(users: Arc<U>, hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    async fn create_account(
        &self,
        username: Username,
        email: EmailAddress,
        password: &NewPassword,
        is_staff: bool,
    ) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(username_taken(username.as_str()));
        }

        let digest = self
            .hasher
            .hash(password.expose())
            .map_err(map_hasher_error)?;
        let user = User {
            id: UserId::random(),
            username,
            email,
            is_staff,
            created_at: self.clock.utc(),
        };
        self.users
            .insert(&UserAccount {
                user: user.clone(),
                password: digest,
            })
            .await
            .map_err(map_repository_error)?;
        Ok(user)
    }

    /// Create the configured staff account unless the username is taken.
    pub async fn ensure_staff_account(
        &self,
        username: Username,
        email: EmailAddress,
        password: &NewPassword,
    ) -> Result<StaffBootstrap, Error> {
        if let Some(existing) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(StaffBootstrap::AlreadyPresent(existing.user.id));
        }
        let user = self.create_account(username, email, password, true).await?;
        Ok(StaffBootstrap::Created(user.id))
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(invalid_credentials());
        };
        let Some(account) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_repository_error)?
        else {
            debug!(username = %username, "login for unknown username");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password)
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %account.user.id, "login with wrong password");
            return Err(invalid_credentials());
        }
        Ok(account.user.id)
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            username,
            email,
            password,
        } = registration;
        let user = self.create_account(username, email, &password, false).await?;
        info!(user_id = %user.id, username = %user.username, "account registered");
        Ok(user)
    }

    async fn change_password(&self, actor: &UserId, change: PasswordChange) -> Result<(), Error> {
        let account = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;

        let matches = self
            .hasher
            .verify(change.old_password(), &account.password)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(
                Error::invalid_request("current password is incorrect").with_details(json!({
                    "field": "oldPassword",
                    "code": "password_incorrect",
                })),
            );
        }

        let digest = self
            .hasher
            .hash(change.new_password.expose())
            .map_err(map_hasher_error)?;
        self.users
            .update_password(actor, &digest)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %actor, "password changed");
        Ok(())
    }
}

#[async_trait]
impl<U> UserDirectory for AccountService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        let account = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        Ok(account.map(|account| account.user))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;

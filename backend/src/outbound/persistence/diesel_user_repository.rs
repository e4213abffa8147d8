//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error_mapping::DbFailure;
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{PasswordDigest, UserAccount, UserId, Username};

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        filter: users::BoxedQuery<'_, diesel::pg::Pg>,
    ) -> Result<Option<UserAccount>, DbFailure> {
        let mut conn = self.pool.get().await?;
        let row: Option<UserRow> = filter
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(UserAccount::try_from).transpose()?)
    }
}

fn map_failure(failure: DbFailure) -> UserRepositoryError {
    failure.into_port_error(UserRepositoryError::connection, UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_failure(e.into()))?;
        let result = diesel::insert_into(users::table)
            .values(UserRow::from(account))
            .execute(&mut conn)
            .await;
        match result.map_err(DbFailure::from) {
            Ok(_) => Ok(()),
            Err(DbFailure::UniqueViolation { .. }) => Err(UserRepositoryError::duplicate_username(
                account.user.username.as_str(),
            )),
            Err(other) => Err(map_failure(other)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let query = users::table
            .filter(users::id.eq(*id.as_uuid()))
            .into_boxed();
        self.find_one(query).await.map_err(map_failure)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let query = users::table
            .filter(users::username.eq(username.as_str().to_owned()))
            .into_boxed();
        self.find_one(query).await.map_err(map_failure)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|e| map_failure(e.into()))?;
        let updated = diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set(users::password_hash.eq(password.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|e| map_failure(e.into()))?;
        if updated == 0 {
            return Err(UserRepositoryError::query(format!("user {id} not found")));
        }
        Ok(())
    }
}

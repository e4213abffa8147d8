//! PostgreSQL-backed [`NotificationRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error_mapping::DbFailure;
use super::models::NotificationRow;
use super::pool::DbPool;
use super::schema::notifications;
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationId, UserId};

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DbFailure) -> NotificationRepositoryError {
    failure.into_port_error(
        NotificationRepositoryError::connection,
        NotificationRepositoryError::query,
    )
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(notifications::table)
                .values(NotificationRow::from(notification))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(())
        };
        run.await.map_err(map_failure)
    }

    async fn find(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let row: Option<NotificationRow> = notifications::table
                .filter(notifications::id.eq(*id.as_uuid()))
                .select(NotificationRow::as_select())
                .first(&mut conn)
                .await
                .optional()?;
            Ok::<_, DbFailure>(row.map(Notification::from))
        };
        run.await.map_err(map_failure)
    }

    async fn list_for_recipient(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<NotificationRow> = notifications::table
                .filter(notifications::recipient_id.eq(*recipient.as_uuid()))
                .order_by(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .load(&mut conn)
                .await?;
            Ok::<_, DbFailure>(rows.into_iter().map(Notification::from).collect())
        };
        run.await.map_err(map_failure)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let updated = diesel::update(notifications::table.find(*id.as_uuid()))
                .set(notifications::is_read.eq(true))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(updated > 0)
        };
        run.await.map_err(map_failure)
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let deleted = diesel::delete(notifications::table.find(*id.as_uuid()))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(deleted > 0)
        };
        run.await.map_err(map_failure)
    }
}

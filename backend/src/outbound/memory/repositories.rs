//! Account, catalogue and notification repositories over [`InMemoryStore`].

use async_trait::async_trait;

use super::{InMemoryStore, Poisoned, newest_first};
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, GameRepository, GameRepositoryError,
    NotificationRepository, NotificationRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Article, ArticleSlug, Game, GameId, GameName, Notification, NotificationId, PasswordDigest,
    UserAccount, UserId, Username,
};

impl From<Poisoned> for UserRepositoryError {
    fn from(value: Poisoned) -> Self {
        Self::query(value.message())
    }
}

impl From<Poisoned> for GameRepositoryError {
    fn from(value: Poisoned) -> Self {
        Self::query(value.message())
    }
}

impl From<Poisoned> for ArticleRepositoryError {
    fn from(value: Poisoned) -> Self {
        Self::query(value.message())
    }
}

impl From<Poisoned> for NotificationRepositoryError {
    fn from(value: Poisoned) -> Self {
        Self::query(value.message())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock()?;
        if tables
            .users
            .iter()
            .any(|existing| existing.user.username == account.user.username)
        {
            return Err(UserRepositoryError::duplicate_username(
                account.user.username.as_str(),
            ));
        }
        tables.users.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|a| &a.user.id == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .find(|a| &a.user.username == username)
            .cloned())
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<(), UserRepositoryError> {
        let mut tables = self.lock()?;
        let account = tables
            .users
            .iter_mut()
            .find(|a| &a.user.id == id)
            .ok_or_else(|| UserRepositoryError::query(format!("user {id} does not exist")))?;
        account.password = password.clone();
        Ok(())
    }
}

#[async_trait]
impl GameRepository for InMemoryStore {
    async fn insert(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut tables = self.lock()?;
        if tables.games.iter().any(|existing| existing.name == game.name) {
            return Err(GameRepositoryError::duplicate_name(game.name.as_str()));
        }
        tables.games.push(game.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, GameRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.games.iter().find(|g| &g.id == id).cloned())
    }

    async fn find_by_name(&self, name: &GameName) -> Result<Option<Game>, GameRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.games.iter().find(|g| &g.name == name).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Game>, GameRepositoryError> {
        let tables = self.lock()?;
        let mut games = tables.games.clone();
        games.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(games)
    }

    async fn latest(&self) -> Result<Option<Game>, GameRepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.games.iter(), |g| g.created_at)
            .into_iter()
            .next())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let mut tables = self.lock()?;
        if tables.articles.iter().any(|a| a.slug == article.slug) {
            return Err(ArticleRepositoryError::duplicate_slug(article.slug.as_str()));
        }
        tables.articles.push(article.clone());
        Ok(())
    }

    async fn slug_exists(&self, slug: &ArticleSlug) -> Result<bool, ArticleRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.articles.iter().any(|a| &a.slug == slug))
    }

    async fn find_by_slug(
        &self,
        slug: &ArticleSlug,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.articles.iter().find(|a| &a.slug == slug).cloned())
    }

    async fn list_newest_first(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.articles.iter(), |a| a.created_at))
    }

    async fn latest(&self) -> Result<Option<Article>, ArticleRepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.articles.iter(), |a| a.created_at)
            .into_iter()
            .next())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut tables = self.lock()?;
        tables.notifications.push(notification.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let tables = self.lock()?;
        Ok(tables.notifications.iter().find(|n| &n.id == id).cloned())
    }

    async fn list_for_recipient(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(
            tables
                .notifications
                .iter()
                .filter(|n| &n.recipient_id == recipient)
                .collect::<Vec<_>>()
                .into_iter(),
            |n| n.created_at,
        ))
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let mut tables = self.lock()?;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| &n.id == id)
            .map(|n| n.is_read = true)
            .is_some())
    }

    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationRepositoryError> {
        let mut tables = self.lock()?;
        let before = tables.notifications.len();
        tables.notifications.retain(|n| &n.id != id);
        Ok(tables.notifications.len() != before)
    }
}

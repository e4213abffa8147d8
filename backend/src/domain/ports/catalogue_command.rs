//! Driving port for staff-only catalogue mutations.

use async_trait::async_trait;

use crate::domain::{Article, Error, Game, NewArticle, NewGame};

/// Domain use-case port for publishing games and articles.
///
/// Callers are expected to have checked the `ManageCatalogue` capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Add a game; duplicate names are a conflict.
    async fn create_game(&self, game: NewGame) -> Result<Game, Error>;

    /// Publish an article under a freshly allocated slug.
    async fn create_article(&self, article: NewArticle) -> Result<Article, Error>;
}

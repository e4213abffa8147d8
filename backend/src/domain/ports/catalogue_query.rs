//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{Article, ArticleSlug, Error, Game};

/// Domain use-case port for browsing games and articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// All games ordered by name.
    async fn list_games(&self) -> Result<Vec<Game>, Error>;

    /// All articles, newest first.
    async fn list_articles(&self) -> Result<Vec<Article>, Error>;

    /// One article by slug.
    async fn article(&self, slug: &ArticleSlug) -> Result<Article, Error>;

    /// Most recently added game.
    async fn latest_game(&self) -> Result<Option<Game>, Error>;

    /// Most recently published article.
    async fn latest_article(&self) -> Result<Option<Article>, Error>;
}

//! Port for article persistence.

use async_trait::async_trait;

use crate::domain::{Article, ArticleSlug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// The slug was claimed by a concurrent insert.
        DuplicateSlug { slug: String } => "article slug {slug} already exists",
    }
}

/// Port for reading and writing articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article; the slug must be unused.
    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError>;

    /// Whether an article already uses `slug`.
    async fn slug_exists(&self, slug: &ArticleSlug) -> Result<bool, ArticleRepositoryError>;

    /// Fetch an article by slug.
    async fn find_by_slug(
        &self,
        slug: &ArticleSlug,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// All articles, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Most recently published article.
    async fn latest(&self) -> Result<Option<Article>, ArticleRepositoryError>;
}

//! Driving port for the landing page.

use async_trait::async_trait;

use crate::domain::{Article, Error, Game};

use super::ListingView;

/// Newest item of each kind shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontPage {
    pub latest_game: Option<Game>,
    pub latest_article: Option<Article>,
    pub latest_listing: Option<ListingView>,
}

/// Domain use-case port for the landing page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrontPageQuery: Send + Sync {
    /// Assemble the landing page.
    async fn front_page(&self) -> Result<FrontPage, Error>;
}

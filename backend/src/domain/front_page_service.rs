//! Landing page composed from the catalogue and the marketplace.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ports::{CatalogueQuery, FrontPage, FrontPageQuery, MarketQuery};

/// Builds the landing page from the newest game, article and listing.
#[derive(Clone)]
pub struct FrontPageService {
    catalogue: Arc<dyn CatalogueQuery>,
    market: Arc<dyn MarketQuery>,
}

impl FrontPageService {
    /// Create a front-page service over the read ports.
    pub fn new(catalogue: Arc<dyn CatalogueQuery>, market: Arc<dyn MarketQuery>) -> Self {
        Self { catalogue, market }
    }
}

#[async_trait]
impl FrontPageQuery for FrontPageService {
    async fn front_page(&self) -> Result<FrontPage, Error> {
        Ok(FrontPage {
            latest_game: self.catalogue.latest_game().await?,
            latest_article: self.catalogue.latest_article().await?,
            latest_listing: self.market.latest_open_listing().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ports::{MockCatalogueQuery, MockMarketQuery};
    use crate::domain::{Game, GameId, GameName};

    #[tokio::test]
    async fn empty_site_yields_empty_front_page() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue.expect_latest_game().returning(|| Ok(None));
        catalogue.expect_latest_article().returning(|| Ok(None));
        let mut market = MockMarketQuery::new();
        market.expect_latest_open_listing().returning(|| Ok(None));

        let page = FrontPageService::new(Arc::new(catalogue), Arc::new(market))
            .front_page()
            .await
            .expect("front page");
        assert_eq!(page, FrontPage::default());
    }

    #[tokio::test]
    async fn latest_game_is_shown() {
        let game = Game {
            id: GameId::random(),
            name: GameName::new("Game 1").expect("name"),
            description: String::new(),
            created_at: Utc::now(),
        };
        let expected = game.clone();
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_latest_game()
            .returning(move || Ok(Some(game.clone())));
        catalogue.expect_latest_article().returning(|| Ok(None));
        let mut market = MockMarketQuery::new();
        market.expect_latest_open_listing().returning(|| Ok(None));

        let page = FrontPageService::new(Arc::new(catalogue), Arc::new(market))
            .front_page()
            .await
            .expect("front page");
        assert_eq!(page.latest_game, Some(expected));
    }
}

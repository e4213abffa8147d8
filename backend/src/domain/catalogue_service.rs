//! Catalogue service: games and editorial articles.
//!
//! Article slugs derive from the title. A taken slug gets `-1`, `-2`, …
//! appended until a free one is found; a unique-constraint race on insert
//! resumes the search from the next suffix.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::lookups::{map_game_repository_error, require_game};
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CatalogueCommand, CatalogueQuery, GameRepository,
};
use crate::domain::{Article, ArticleSlug, Error, Game, GameId, NewArticle, NewGame};

/// Inserts attempted before a slug race is reported as a conflict.
const SLUG_INSERT_ATTEMPTS: usize = 5;

fn map_article_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
        ArticleRepositoryError::DuplicateSlug { slug } => {
            Error::conflict(format!("article slug {slug} already exists"))
        }
    }
}

/// Catalogue service backed by game and article repositories.
#[derive(Clone)]
pub struct CatalogueService<G, A> {
    games: Arc<G>,
    articles: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<G, A> CatalogueService<G, A> {
    /// Create a catalogue service.
    pub fn new(games: Arc<G>, articles: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            games,
            articles,
            clock,
        }
    }
}

impl<G, A> CatalogueService<G, A>
where
    G: GameRepository,
    A: ArticleRepository,
{
    /// First free slug at or after suffix `start` (0 means the bare slug).
    async fn next_free_slug(
        &self,
        base: &ArticleSlug,
        start: u32,
    ) -> Result<(ArticleSlug, u32), Error> {
        let mut suffix = start;
        loop {
            let candidate = if suffix == 0 {
                base.clone()
            } else {
                base.with_suffix(suffix)
            };
            let taken = self
                .articles
                .slug_exists(&candidate)
                .await
                .map_err(map_article_repository_error)?;
            if !taken {
                return Ok((candidate, suffix));
            }
            suffix += 1;
        }
    }
}

#[async_trait]
impl<G, A> CatalogueCommand for CatalogueService<G, A>
where
    G: GameRepository,
    A: ArticleRepository,
{
    async fn create_game(&self, game: NewGame) -> Result<Game, Error> {
        let existing = self
            .games
            .find_by_name(&game.name)
            .await
            .map_err(map_game_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(format!("game {} already exists", game.name)));
        }
        let game = Game {
            id: GameId::random(),
            name: game.name,
            description: game.description,
            created_at: self.clock.utc(),
        };
        self.games
            .insert(&game)
            .await
            .map_err(map_game_repository_error)?;
        info!(game_id = %game.id, name = %game.name, "game added");
        Ok(game)
    }

    async fn create_article(&self, article: NewArticle) -> Result<Article, Error> {
        require_game(self.games.as_ref(), &article.game_id).await?;
        let base = ArticleSlug::from_title(&article.title).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": "title", "code": "empty_slug" }))
        })?;

        let NewArticle {
            game_id,
            title,
            content,
        } = article;
        let created_at = self.clock.utc();
        let mut start = 0;
        for _ in 0..SLUG_INSERT_ATTEMPTS {
            let (slug, suffix) = self.next_free_slug(&base, start).await?;
            let candidate = Article {
                slug,
                game_id,
                title: title.clone(),
                content: content.clone(),
                created_at,
            };
            match self.articles.insert(&candidate).await {
                Ok(()) => {
                    info!(slug = %candidate.slug, game_id = %game_id, "article published");
                    return Ok(candidate);
                }
                Err(ArticleRepositoryError::DuplicateSlug { slug }) => {
                    debug!(%slug, "slug claimed concurrently; trying the next suffix");
                    start = suffix + 1;
                }
                Err(other) => return Err(map_article_repository_error(other)),
            }
        }
        Err(Error::conflict(format!(
            "could not allocate a unique slug for {base}"
        )))
    }
}

#[async_trait]
impl<G, A> CatalogueQuery for CatalogueService<G, A>
where
    G: GameRepository,
    A: ArticleRepository,
{
    async fn list_games(&self) -> Result<Vec<Game>, Error> {
        self.games
            .list_all()
            .await
            .map_err(map_game_repository_error)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, Error> {
        self.articles
            .list_newest_first()
            .await
            .map_err(map_article_repository_error)
    }

    async fn article(&self, slug: &ArticleSlug) -> Result<Article, Error> {
        self.articles
            .find_by_slug(slug)
            .await
            .map_err(map_article_repository_error)?
            .ok_or_else(|| Error::not_found(format!("article {slug} not found")))
    }

    async fn latest_game(&self) -> Result<Option<Game>, Error> {
        self.games.latest().await.map_err(map_game_repository_error)
    }

    async fn latest_article(&self) -> Result<Option<Article>, Error> {
        self.articles
            .latest()
            .await
            .map_err(map_article_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockArticleRepository, MockGameRepository};
    use crate::domain::{ErrorCode, GameName};

    fn game() -> Game {
        Game {
            id: GameId::random(),
            name: GameName::new("Test Game").expect("name"),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn games_knowing(game: &Game) -> MockGameRepository {
        let game = game.clone();
        let mut games = MockGameRepository::new();
        games
            .expect_find_by_id()
            .returning(move |_| Ok(Some(game.clone())));
        games
    }

    fn service(
        games: MockGameRepository,
        articles: MockArticleRepository,
    ) -> CatalogueService<MockGameRepository, MockArticleRepository> {
        CatalogueService::new(Arc::new(games), Arc::new(articles), Arc::new(DefaultClock))
    }

    fn new_article(game: &Game, title: &str) -> NewArticle {
        NewArticle::try_from_parts(game.id, title, "Body").expect("article")
    }

    #[tokio::test]
    async fn duplicate_game_name_is_a_conflict() {
        let existing = game();
        let mut games = MockGameRepository::new();
        games
            .expect_find_by_name()
            .returning(move |_| Ok(Some(existing.clone())));
        games.expect_insert().times(0);

        let err = service(games, MockArticleRepository::new())
            .create_game(NewGame::try_from_parts("Test Game", "").expect("game"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn new_game_is_stored() {
        let mut games = MockGameRepository::new();
        games.expect_find_by_name().returning(|_| Ok(None));
        games
            .expect_insert()
            .withf(|game| game.name.as_str() == "Game 1")
            .times(1)
            .returning(|_| Ok(()));

        let created = service(games, MockArticleRepository::new())
            .create_game(NewGame::try_from_parts("Game 1", "desc").expect("game"))
            .await
            .expect("game created");
        assert_eq!(created.description, "desc");
    }

    #[rstest]
    #[case::free(&[], "test-game")]
    #[case::taken_once(&["test-game"], "test-game-1")]
    #[case::taken_twice(&["test-game", "test-game-1"], "test-game-2")]
    #[tokio::test]
    async fn article_slug_skips_taken_values(#[case] taken: &[&str], #[case] expected: &str) {
        let game = game();
        let taken: Vec<String> = taken.iter().map(|s| (*s).to_owned()).collect();
        let mut articles = MockArticleRepository::new();
        articles
            .expect_slug_exists()
            .returning(move |slug| Ok(taken.iter().any(|t| t == slug.as_str())));
        articles.expect_insert().times(1).returning(|_| Ok(()));

        let article = service(games_knowing(&game), articles)
            .create_article(new_article(&game, "Test Game"))
            .await
            .expect("article created");
        assert_eq!(article.slug.as_str(), expected);
    }

    #[tokio::test]
    async fn slug_race_moves_to_next_suffix() {
        let game = game();
        let attempts = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen = Arc::clone(&attempts);
        let mut articles = MockArticleRepository::new();
        articles.expect_slug_exists().returning(|_| Ok(false));
        articles.expect_insert().times(2).returning(move |article| {
            let mut seen = seen.lock().expect("lock");
            seen.push(article.slug.as_str().to_owned());
            if seen.len() == 1 {
                Err(ArticleRepositoryError::duplicate_slug(article.slug.as_str()))
            } else {
                Ok(())
            }
        });

        let article = service(games_knowing(&game), articles)
            .create_article(new_article(&game, "Test Game"))
            .await
            .expect("article created");
        assert_eq!(article.slug.as_str(), "test-game-1");
        assert_eq!(
            *attempts.lock().expect("lock"),
            vec!["test-game".to_owned(), "test-game-1".to_owned()]
        );
    }

    #[tokio::test]
    async fn title_without_slug_characters_is_rejected() {
        let game = game();
        let mut articles = MockArticleRepository::new();
        articles.expect_insert().times(0);

        let err = service(games_knowing(&game), articles)
            .create_article(new_article(&game, "!!!"))
            .await
            .expect_err("empty slug");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn missing_article_is_not_found() {
        let mut articles = MockArticleRepository::new();
        articles.expect_find_by_slug().returning(|_| Ok(None));

        let err = service(MockGameRepository::new(), articles)
            .article(&ArticleSlug::new("nope").expect("slug"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

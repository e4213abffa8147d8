//! PostgreSQL-backed game and article repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error_mapping::DbFailure;
use super::models::{ArticleRow, GameRow, convert_rows};
use super::pool::DbPool;
use super::schema::{articles, games};
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, GameRepository, GameRepositoryError,
};
use crate::domain::{Article, ArticleSlug, Game, GameId, GameName};

#[derive(Clone)]
pub struct DieselGameRepository {
    pool: DbPool,
}

impl DieselGameRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        query: games::BoxedQuery<'_, diesel::pg::Pg>,
    ) -> Result<Vec<Game>, GameRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<GameRow> = query
                .select(GameRow::as_select())
                .load(&mut conn)
                .await?;
            Ok::<_, DbFailure>(convert_rows::<_, Game>(rows)?)
        };
        run.await.map_err(map_game_failure)
    }
}

fn map_game_failure(failure: DbFailure) -> GameRepositoryError {
    failure.into_port_error(GameRepositoryError::connection, GameRepositoryError::query)
}

#[async_trait]
impl GameRepository for DieselGameRepository {
    async fn insert(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(games::table)
                .values(GameRow::from(game))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(())
        };
        match run.await {
            Ok(()) => Ok(()),
            Err(DbFailure::UniqueViolation { .. }) => {
                Err(GameRepositoryError::duplicate_name(game.name.as_str()))
            }
            Err(other) => Err(map_game_failure(other)),
        }
    }

    async fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, GameRepositoryError> {
        let query = games::table.filter(games::id.eq(*id.as_uuid())).into_boxed();
        Ok(self.load(query).await?.into_iter().next())
    }

    async fn find_by_name(&self, name: &GameName) -> Result<Option<Game>, GameRepositoryError> {
        let query = games::table
            .filter(games::name.eq(name.as_str().to_owned()))
            .into_boxed();
        Ok(self.load(query).await?.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Game>, GameRepositoryError> {
        self.load(games::table.order_by(games::name.asc()).into_boxed())
            .await
    }

    async fn latest(&self) -> Result<Option<Game>, GameRepositoryError> {
        let query = games::table
            .order_by(games::created_at.desc())
            .limit(1)
            .into_boxed();
        Ok(self.load(query).await?.into_iter().next())
    }
}

#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        query: articles::BoxedQuery<'_, diesel::pg::Pg>,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<ArticleRow> = query
                .select(ArticleRow::as_select())
                .load(&mut conn)
                .await?;
            Ok::<_, DbFailure>(convert_rows::<_, Article>(rows)?)
        };
        run.await.map_err(map_article_failure)
    }
}

fn map_article_failure(failure: DbFailure) -> ArticleRepositoryError {
    failure.into_port_error(ArticleRepositoryError::connection, ArticleRepositoryError::query)
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            diesel::insert_into(articles::table)
                .values(ArticleRow::from(article))
                .execute(&mut conn)
                .await?;
            Ok::<_, DbFailure>(())
        };
        match run.await {
            Ok(()) => Ok(()),
            Err(DbFailure::UniqueViolation { .. }) => {
                Err(ArticleRepositoryError::duplicate_slug(article.slug.as_str()))
            }
            Err(other) => Err(map_article_failure(other)),
        }
    }

    async fn slug_exists(&self, slug: &ArticleSlug) -> Result<bool, ArticleRepositoryError> {
        let run = async {
            let mut conn = self.pool.get().await?;
            let exists = diesel::select(diesel::dsl::exists(
                articles::table.filter(articles::slug.eq(slug.as_str())),
            ))
            .get_result::<bool>(&mut conn)
            .await?;
            Ok::<_, DbFailure>(exists)
        };
        run.await.map_err(map_article_failure)
    }

    async fn find_by_slug(
        &self,
        slug: &ArticleSlug,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let query = articles::table
            .filter(articles::slug.eq(slug.as_str().to_owned()))
            .into_boxed();
        Ok(self.load(query).await?.into_iter().next())
    }

    async fn list_newest_first(&self) -> Result<Vec<Article>, ArticleRepositoryError> {
        self.load(articles::table.order_by(articles::created_at.desc()).into_boxed())
            .await
    }

    async fn latest(&self) -> Result<Option<Article>, ArticleRepositoryError> {
        let query = articles::table
            .order_by(articles::created_at.desc())
            .limit(1)
            .into_boxed();
        Ok(self.load(query).await?.into_iter().next())
    }
}

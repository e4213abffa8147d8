//! Game and article endpoints.
//!
//! ```text
//! GET  /api/v1/games
//! POST /api/v1/games {"name":"Game 1","description":"…"}
//! GET  /api/v1/articles
//! POST /api/v1/articles {"gameId":"…","title":"Test Game","content":"…"}
//! GET  /api/v1/articles/{slug}
//! ```
//!
//! Reading the catalogue is public except for article bodies, which need a
//! session. Creating entries needs staff rights.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ArticleSlug, Capability, Error, GameId, NewArticle, NewGame};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ArticleResponse, GameResponse, collect};
use crate::inbound::http::guards::require_capability;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_catalogue_error, parse_id};

/// Body for `POST /api/v1/games`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[schema(example = "Game 1")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST /api/v1/articles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub game_id: String,
    #[schema(example = "Test Game")]
    pub title: String,
    pub content: String,
}

/// List every game by name.
#[utoipa::path(
    get,
    path = "/api/v1/games",
    responses(
        (status = 200, description = "Games", body = [GameResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listGames",
    security([])
)]
#[get("/games")]
pub async fn list_games(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let games = state.catalogue_query.list_games().await?;
    Ok(web::Json(collect(games)))
}

/// Add a game to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Staff only", body = Error),
        (status = 409, description = "Name already used", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createGame"
)]
#[post("/games")]
pub async fn create_game(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGameRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    require_capability(state.users.as_ref(), &actor, Capability::ManageCatalogue).await?;
    let body = payload.into_inner();
    let game = NewGame::try_from_parts(&body.name, body.description.as_deref().unwrap_or(""))
        .map_err(map_catalogue_error)?;
    let game = state.catalogue.create_game(game).await?;
    info!(game_id = %game.id, "game created");
    Ok(HttpResponse::Created().json(GameResponse::from(game)))
}

/// List every article, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    responses(
        (status = 200, description = "Articles", body = [ArticleResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ArticleResponse>>> {
    let articles = state.catalogue_query.list_articles().await?;
    Ok(web::Json(collect(articles)))
}

/// Publish an article; the slug is derived from the title.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Staff only", body = Error),
        (status = 404, description = "Unknown game", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    require_capability(state.users.as_ref(), &actor, Capability::ManageCatalogue).await?;
    let body = payload.into_inner();
    let game_id: GameId = parse_id(&body.game_id, FieldName::new("gameId"))?;
    let article = NewArticle::try_from_parts(game_id, &body.title, &body.content)
        .map_err(map_catalogue_error)?;
    let article = state.catalogue.create_article(article).await?;
    info!(slug = %article.slug, "article published");
    Ok(HttpResponse::Created().json(ArticleResponse::from(article)))
}

/// Read one article.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getArticle"
)]
#[get("/articles/{slug}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleResponse>> {
    session.require_user_id()?;
    let slug = ArticleSlug::new(path.into_inner())
        .map_err(|_| Error::not_found("article not found"))?;
    let article = state.catalogue_query.article(&slug).await?;
    Ok(web::Json(article.into()))
}

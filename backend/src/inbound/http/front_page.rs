//! `GET /api/v1/front-page`: newest game, article and open listing.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::FrontPage;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ArticleResponse, GameResponse, ListingResponse};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrontPageResponse {
    pub latest_game: Option<GameResponse>,
    pub latest_article: Option<ArticleResponse>,
    pub latest_listing: Option<ListingResponse>,
}

impl From<FrontPage> for FrontPageResponse {
    fn from(page: FrontPage) -> Self {
        Self {
            latest_game: page.latest_game.map(Into::into),
            latest_article: page.latest_article.map(Into::into),
            latest_listing: page.latest_listing.map(Into::into),
        }
    }
}

/// Landing page summary; each entry is absent when nothing exists yet.
#[utoipa::path(
    get,
    path = "/api/v1/front-page",
    responses(
        (status = 200, description = "Front page", body = FrontPageResponse),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "frontPage",
    security([])
)]
#[get("/front-page")]
pub async fn front_page(state: web::Data<HttpState>) -> ApiResult<web::Json<FrontPageResponse>> {
    let page = state.front_page.front_page().await?;
    Ok(web::Json(page.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[actix_web::test]
    async fn empty_site_serialises_nulls() {
        let mut ports = TestPorts::new();
        ports
            .front_page
            .expect_front_page()
            .returning(|| Ok(FrontPage::default()));
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/front-page")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("latestGame"), Some(&Value::Null));
        assert_eq!(body.get("latestListing"), Some(&Value::Null));
    }
}

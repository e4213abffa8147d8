//! User page handlers.
//!
//! ```text
//! GET /api/v1/users/{id}
//! GET /api/v1/users/{id}/notifications
//! ```
//!
//! Both endpoints only answer for the signed-in user; anyone else's id reads
//! as missing.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserPage;
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ListingResponse, NotificationResponse, UserResponse, collect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_id;

/// Everything shown on a user's own page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    pub user: UserResponse,
    pub active_offers: Vec<ListingResponse>,
    pub inactive_offers: Vec<ListingResponse>,
    pub notifications: Vec<NotificationResponse>,
}

impl From<UserPage> for UserPageResponse {
    fn from(page: UserPage) -> Self {
        Self {
            user: page.user.into(),
            active_offers: collect(page.active_offers),
            inactive_offers: collect(page.inactive_offers),
            notifications: collect(page.notifications),
        }
    }
}

/// Fetch the signed-in user's page.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User page", body = UserPageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user or not the caller", body = Error)
    ),
    tags = ["users"],
    operation_id = "userPage"
)]
#[get("/users/{id}")]
pub async fn user_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserPageResponse>> {
    let actor = session.require_user_id()?;
    let user_id: UserId = parse_path_id(&path.into_inner(), "user")?;
    let page = state.market_query.user_page(&actor, &user_id).await?;
    Ok(web::Json(page.into()))
}

/// List the signed-in user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/notifications",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Notifications", body = [NotificationResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user or not the caller", body = Error)
    ),
    tags = ["users"],
    operation_id = "listNotifications"
)]
#[get("/users/{id}/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<NotificationResponse>>> {
    let actor = session.require_user_id()?;
    let user_id: UserId = parse_path_id(&path.into_inner(), "user")?;
    let notifications = state
        .notifications_query
        .list_notifications(&actor, &user_id)
        .await?;
    Ok(web::Json(collect(notifications)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, User, Username};
    use crate::inbound::http::test_utils::{TestPorts, sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::Utc;
    use serde_json::Value;

    fn user(id: UserId) -> User {
        User {
            id,
            username: Username::new("u1").expect("username"),
            email: EmailAddress::new("u1@example.com").expect("email"),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn user_page_is_served_for_the_caller() {
        let id = UserId::random();
        let mut ports = TestPorts::new();
        ports.login.expect_authenticate().returning(move |_| Ok(id));
        ports
            .market_query
            .expect_user_page()
            .withf(move |actor, target| *actor == id && *target == id)
            .returning(move |_, _| {
                Ok(UserPage {
                    user: user(id),
                    active_offers: Vec::new(),
                    inactive_offers: Vec::new(),
                    notifications: Vec::new(),
                })
            });
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = sign_in(&app).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{id}"))
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.pointer("/user/username").and_then(Value::as_str), Some("u1"));
        assert!(body.get("activeOffers").is_some_and(Value::is_array));
    }

    #[actix_web::test]
    async fn malformed_user_id_reads_as_missing() {
        let id = UserId::random();
        let mut ports = TestPorts::new();
        ports.login.expect_authenticate().returning(move |_| Ok(id));
        ports.market_query.expect_user_page().times(0);
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let cookie = sign_in(&app).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid")
            .cookie(cookie)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn anonymous_callers_get_login_url() {
        let ports = TestPorts::new();
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}/notifications", UserId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/loginUrl").and_then(Value::as_str),
            Some("/api/v1/login")
        );
    }
}

//! Notification handlers.
//!
//! ```text
//! POST   /api/v1/notifications/{id}/read
//! DELETE /api/v1/notifications/{id}
//! ```

use actix_web::{HttpResponse, delete, post, web};

use crate::domain::{Error, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::NotificationResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_id;

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 200, description = "Updated notification", body = NotificationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<NotificationResponse>> {
    let actor = session.require_user_id()?;
    let id: NotificationId = parse_path_id(&path.into_inner(), "notification")?;
    let notification = state.notifications.mark_read(&actor, &id).await?;
    Ok(web::Json(notification.into()))
}

/// Delete one of the caller's notifications.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id: NotificationId = parse_path_id(&path.into_inner(), "notification")?;
    state.notifications.delete(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

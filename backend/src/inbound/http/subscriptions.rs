//! `POST /api/v1/subscribe {"email":"fan@example.com"}`
//!
//! Provider failures never reach the caller; a well-formed address always
//! gets `204 No Content`.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_user_validation_error};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubscribeRequest {
    #[schema(example = "fan@example.com")]
    pub email: String,
}

/// Join the newsletter.
#[utoipa::path(
    post,
    path = "/api/v1/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 204, description = "Subscribed"),
        (status = 400, description = "Invalid email", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe",
    security([])
)]
#[post("/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let email = EmailAddress::new(payload.into_inner().email)
        .map_err(|err| map_user_validation_error(FieldName::new("email"), err))?;
    state.subscriptions.subscribe(&email).await?;
    Ok(HttpResponse::NoContent().finish())
}

//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));
    let (status, header, body) = body_of(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
    assert!(body.get("details").is_none());
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(TRACE_ID));
}

#[actix_web::test]
async fn client_errors_keep_details() {
    let error = Error::invalid_request("bad").with_details(json!({ "field": "price" }));
    let (_, header, body) = body_of(&error).await;
    assert!(header.is_none());
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("price")
    );
}

#[actix_web::test]
async fn unauthorised_responses_point_at_login() {
    let (status, _, body) = body_of(&Error::unauthorized("login required")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body.pointer("/details/loginUrl").and_then(Value::as_str),
        Some(LOGIN_URL)
    );
}

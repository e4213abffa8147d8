//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn scoped_trace_id() -> TraceId {
    TRACE_ID.parse().expect("fixture UUID is valid")
}

#[rstest]
#[case(ErrorCode::InvalidRequest, Error::invalid_request("bad"))]
#[case(ErrorCode::Unauthorized, Error::unauthorized("who"))]
#[case(ErrorCode::Forbidden, Error::forbidden("nope"))]
#[case(ErrorCode::NotFound, Error::not_found("gone"))]
#[case(ErrorCode::Conflict, Error::conflict("taken"))]
#[case(ErrorCode::ServiceUnavailable, Error::service_unavailable("down"))]
#[case(ErrorCode::InternalError, Error::internal("boom"))]
fn convenience_constructors_set_code(#[case] expected: ErrorCode, #[case] error: Error) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::NotFound, "");
    assert_eq!(error.message(), "not found");
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::invalid_request("bad").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(scoped_trace_id: TraceId) {
    let error = TraceId::scope(scoped_trace_id, async { Error::conflict("taken") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_payload() {
    let error = Error::invalid_request("bad")
        .with_details(json!({ "field": "price" }))
        .with_trace_id("abc");
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad",
            "details": { "field": "price" },
            "traceId": "abc",
        })
    );
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace_id(scoped_trace_id: TraceId) {
    let payload = json!({ "code": "not_found", "message": "gone" });
    let error: Error = TraceId::scope(scoped_trace_id, async move {
        serde_json::from_value(payload).expect("deserialise error")
    })
    .await;
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "not_found", "message": "  " });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

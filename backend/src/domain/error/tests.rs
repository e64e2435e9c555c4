//! Tests for the domain error payload and trace-identifier propagation.

use super::*;
use crate::domain::trace_id::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no auth"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("stale"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn try_new_rejects_blank_messages(#[case] message: &str) {
    let result = Error::try_new(ErrorCode::InvalidRequest, message);
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move {
        Error::try_new(ErrorCode::InternalError, "boom")
            .expect("validation accepts non-empty message")
    })
    .await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn with_trace_id_overrides_captured_value(base_error: Error, expected_trace_id: String) {
    let error = base_error.with_trace_id(expected_trace_id.clone());
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn with_details_attaches_payload(base_error: Error) {
    let error = base_error.with_details(json!({ "field": "name" }));
    assert_eq!(error.details(), Some(&json!({ "field": "name" })));
}

#[rstest]
fn display_prints_the_message(base_error: Error) {
    assert_eq!(base_error.to_string(), "bad");
}

#[rstest]
fn serialization_uses_camel_case_and_skips_absent_fields() {
    let error = Error::not_found("missing").with_trace_id(TRACE_ID);
    let value = serde_json::to_value(&error).expect("error serializes");

    assert_eq!(
        value,
        json!({
            "code": "not_found",
            "message": "missing",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn round_trip_preserves_payload(expected_trace_id: String) {
    let error = Error::conflict("already applied")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "applicationId": "a1" }));

    let encoded = serde_json::to_string(&error).expect("error serializes");
    let decoded: Error = serde_json::from_str(&encoded).expect("error deserializes");

    assert_eq!(decoded, error);
}

#[rstest]
fn deserialization_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "invalid_request", "message": "  " }));
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
async fn try_from_error_dto_clears_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let dto = ErrorDto {
        code: ErrorCode::InvalidRequest,
        message: "bad".to_string(),
        trace_id: None,
        details: None,
    };

    let error = TraceId::scope(trace_id, async move {
        Error::try_from(dto).expect("conversion succeeds for valid payload without trace")
    })
    .await;

    assert!(error.trace_id().is_none());
}

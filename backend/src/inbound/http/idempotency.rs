//! Idempotency-key header handling for the funding endpoint.

use actix_web::http::header::HeaderMap;

use crate::domain::{Error, IdempotencyKey, IdempotencyKeyValidationError};

/// Header carrying the client-chosen retry key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Read and validate the optional `Idempotency-Key` header.
///
/// An absent header means the client opted out of idempotent retries.
/// A present header must hold a UUID; anything else is a 400 naming the
/// header, so broken retry loops surface on the first attempt instead of
/// silently recording duplicates.
pub fn idempotency_key_from_headers(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, Error> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| key_error(IdempotencyKeyValidationError::InvalidKey))?;
    IdempotencyKey::new(raw).map(Some).map_err(key_error)
}

fn key_error(err: IdempotencyKeyValidationError) -> Error {
    let reason = match err {
        IdempotencyKeyValidationError::EmptyKey => "must not be empty",
        IdempotencyKeyValidationError::InvalidKey => "must be a valid uuid",
    };
    Error::invalid_request(format!("{IDEMPOTENCY_KEY_HEADER} header {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};
    use rstest::rstest;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("idempotency-key"),
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    #[rstest]
    fn an_absent_header_yields_no_key() {
        let key = idempotency_key_from_headers(&HeaderMap::new()).expect("optional header");
        assert!(key.is_none());
    }

    #[rstest]
    fn a_uuid_header_parses() {
        let headers = headers_with("550e8400-e29b-41d4-a716-446655440000");
        let key = idempotency_key_from_headers(&headers).expect("valid key");
        assert!(key.is_some());
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn malformed_headers_name_the_header_in_the_error(#[case] raw: &str) {
        let headers = headers_with(raw);
        let err = idempotency_key_from_headers(&headers).expect_err("rejects");
        assert!(err.message().contains(IDEMPOTENCY_KEY_HEADER));
    }
}

//! Shared validation helpers for inbound HTTP adapters.
//!
//! Handlers accept loosely-typed wire payloads (strings for identifiers and
//! enums) and use these helpers to produce consistent `invalid_request`
//! envelopes with machine-readable `details`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{CivicId, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Invalid enum or otherwise malformed field value, with the parse error's
/// message forwarded to the client.
pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: String) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a civic id from the wire, mapping domain validation to a field error.
pub(crate) fn parse_civic_id(value: &str, field: FieldName) -> Result<CivicId, Error> {
    CivicId::new(value).map_err(|err| invalid_value_error(field, value, err.to_string()))
}

/// Require a query parameter that serde left as `None`.
pub(crate) fn require_param(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

//! Validation helpers shared by profile entities.

use url::Url;

use super::ProfileValidationError;

pub(super) fn validate_required_text(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, ProfileValidationError> {
    if value.trim().is_empty() {
        return Err(ProfileValidationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(ProfileValidationError::FieldTooLong { field, max });
    }
    Ok(value)
}

pub(super) fn validate_optional_text(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, ProfileValidationError> {
    value
        .map(|text| validate_required_text(text, field, max))
        .transpose()
}

pub(super) fn validate_entries(
    entries: Vec<String>,
    field: &'static str,
) -> Result<Vec<String>, ProfileValidationError> {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ProfileValidationError::BlankEntry { field });
    }
    Ok(entries)
}

pub(super) fn validate_optional_url(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ProfileValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            Url::parse(&raw).map_err(|_| ProfileValidationError::InvalidUrl { field })?;
            Ok(Some(raw))
        }
    }
}

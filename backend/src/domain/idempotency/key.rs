//! Idempotency key validation and storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for [`IdempotencyKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdempotencyKeyValidationError {
    /// The key string was empty.
    EmptyKey,
    /// The key string was not a valid UUID.
    InvalidKey,
}

impl fmt::Display for IdempotencyKeyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "idempotency key must not be empty"),
            Self::InvalidKey => write!(f, "idempotency key must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdempotencyKeyValidationError {}

/// Client-provided idempotency key (UUID).
///
/// Clients send this via the `Idempotency-Key` HTTP header to make retries of
/// a mutation safe. The server uses the key to detect duplicates and replay
/// the previously computed response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(Uuid, String);

impl IdempotencyKey {
    /// Validate and construct an [`IdempotencyKey`] from a string.
    ///
    /// # Errors
    ///
    /// Returns [`IdempotencyKeyValidationError::EmptyKey`] for empty input and
    /// [`IdempotencyKeyValidationError::InvalidKey`] when the input is not a
    /// UUID (including surrounding whitespace).
    pub fn new(key: impl AsRef<str>) -> Result<Self, IdempotencyKeyValidationError> {
        Self::from_owned(key.as_ref().to_owned())
    }

    /// Construct a key directly from an already-validated UUID, e.g. one
    /// loaded from the database.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let raw = uuid.to_string();
        Self(uuid, raw)
    }

    /// Generate a fresh random key. Primarily useful in tests.
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(key: String) -> Result<Self, IdempotencyKeyValidationError> {
        if key.is_empty() {
            return Err(IdempotencyKeyValidationError::EmptyKey);
        }
        if key.trim() != key {
            return Err(IdempotencyKeyValidationError::InvalidKey);
        }
        let parsed =
            Uuid::parse_str(&key).map_err(|_| IdempotencyKeyValidationError::InvalidKey)?;
        Ok(Self(parsed, key))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IdempotencyKey> for String {
    fn from(value: IdempotencyKey) -> Self {
        value.1
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = IdempotencyKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

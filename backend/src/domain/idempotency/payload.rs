//! Payload hashing and canonicalization helpers.

use std::fmt;

use sha2::{Digest, Sha256};

/// Validation errors for [`PayloadHash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadHashError {
    /// The byte slice had an incorrect length.
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        actual: usize,
    },
    /// Failed to serialise the canonical JSON payload.
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
}

impl fmt::Display for PayloadHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "payload hash must be {expected} bytes, got {actual}")
            }
            Self::Serialization { message } => {
                write!(f, "failed to serialise canonical JSON payload: {message}")
            }
        }
    }
}

impl std::error::Error for PayloadHashError {}

/// SHA-256 hash of a canonicalized request payload.
///
/// Two requests carrying the same idempotency key compare payload hashes:
/// equal hashes mean an honest retry, unequal hashes mean key reuse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadHash([u8; 32]);

impl PayloadHash {
    /// Construct a [`PayloadHash`] from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadHashError::InvalidLength`] when the slice is not
    /// exactly 32 bytes.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, PayloadHashError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| PayloadHashError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Construct a [`PayloadHash`] from a 32-byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode the hash as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Canonicalize a JSON value and compute its SHA-256 hash.
///
/// Object keys are sorted recursively (arrays keep element order), the result
/// is serialized to compact JSON, and the hash is computed over the UTF-8
/// bytes. Semantically equal payloads therefore always hash equally.
///
/// # Errors
///
/// Returns [`PayloadHashError::Serialization`] when the canonical value
/// cannot be serialized.
///
/// # Examples
///
/// ```
/// use backend::domain::canonicalize_and_hash;
/// use serde_json::json;
///
/// let a = canonicalize_and_hash(&json!({"b": 2, "a": 1})).expect("hash");
/// let b = canonicalize_and_hash(&json!({"a": 1, "b": 2})).expect("hash");
/// assert_eq!(a, b);
/// ```
pub fn canonicalize_and_hash(value: &serde_json::Value) -> Result<PayloadHash, PayloadHashError> {
    let canonical = canonicalize(value);
    let json_bytes =
        serde_json::to_vec(&canonical).map_err(|err| PayloadHashError::Serialization {
            message: err.to_string(),
        })?;
    let digest: [u8; 32] = Sha256::digest(&json_bytes).into();
    Ok(PayloadHash::from_bytes(digest))
}

/// Recursively sort object keys for a canonical JSON representation.
fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, nested)| (key.clone(), canonicalize(nested)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize).collect())
        }
        other => other.clone(),
    }
}

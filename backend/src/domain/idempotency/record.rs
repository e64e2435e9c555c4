//! Stored idempotency records and lookup types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{IdempotencyKey, MutationType, PayloadHash};

/// One recorded mutation, keyed by the client's retry key.
///
/// The snapshot is the exact response body served for the first attempt;
/// replays return it untouched so retries cannot observe drift.
#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    /// Retry key supplied by the client.
    pub key: IdempotencyKey,
    /// The kind of mutation this record protects.
    pub mutation_type: MutationType,
    /// SHA-256 over the canonicalized request payload.
    pub payload_hash: PayloadHash,
    /// Response body served for the original attempt.
    pub response_snapshot: serde_json::Value,
    /// Caller who made the original request.
    pub user_id: Uuid,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Outcome of looking up an idempotency key in the store.
#[derive(Debug, Clone)]
pub enum IdempotencyLookupResult {
    /// No record exists for this key.
    NotFound,
    /// A record exists and the payload hash matches (replay).
    MatchingPayload(IdempotencyRecord),
    /// A record exists but the payload hash differs (conflict).
    ConflictingPayload(IdempotencyRecord),
}

/// Parameter object for an idempotency lookup.
///
/// Lookups match on key, caller, and mutation kind together, so two
/// callers reusing the same key never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyLookupQuery {
    /// Retry key to look up.
    pub key: IdempotencyKey,
    /// Caller making the request.
    pub user_id: Uuid,
    /// The kind of mutation being performed.
    pub mutation_type: MutationType,
    /// Hash of the request payload.
    pub payload_hash: PayloadHash,
}

impl IdempotencyLookupQuery {
    pub fn new(
        key: IdempotencyKey,
        user_id: Uuid,
        mutation_type: MutationType,
        payload_hash: PayloadHash,
    ) -> Self {
        Self {
            key,
            user_id,
            mutation_type,
            payload_hash,
        }
    }
}

//! Port abstraction for idempotency key persistence.
//!
//! The [`IdempotencyRepository`] trait defines the contract for storing and
//! retrieving idempotency records. Adapters implement this trait to provide
//! durable storage that survives server restarts, so a retried funding
//! request replays its original response instead of double-recording.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord, MutationType,
};

/// Errors raised by idempotency repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdempotencyRepositoryError {
    /// Repository connection could not be established.
    #[error("idempotency repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("idempotency repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// Response serialization or deserialization failed.
    #[error("idempotency repository serialization failed: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
    /// A record with this key already exists (concurrent insert race).
    #[error("idempotency key already exists: {message}")]
    DuplicateKey {
        /// Description of the conflicting insert.
        message: String,
    },
}

/// Port for idempotency record storage and retrieval.
///
/// Lookups are scoped to the requesting user and mutation type, so a key
/// cannot replay another user's response or leak across operation kinds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    /// Look up an idempotency key.
    ///
    /// Returns:
    /// - [`IdempotencyLookupResult::NotFound`] if no record exists for the key.
    /// - [`IdempotencyLookupResult::MatchingPayload`] if a record exists for
    ///   this user and the payload hash matches.
    /// - [`IdempotencyLookupResult::ConflictingPayload`] if a record exists
    ///   but the payload hash differs or the key belongs to another user.
    async fn lookup(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError>;

    /// Store an idempotency record.
    ///
    /// Fails with [`IdempotencyRepositoryError::DuplicateKey`] when a record
    /// for the key already landed, which callers treat as losing a race.
    async fn store(&self, record: &IdempotencyRecord) -> Result<(), IdempotencyRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureIdempotencyRepository {
    records: Mutex<HashMap<(Uuid, MutationType), IdempotencyRecord>>,
}

impl FixtureIdempotencyRepository {
    fn lock(&self) -> MutexGuard<'_, HashMap<(Uuid, MutationType), IdempotencyRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdempotencyRepository for FixtureIdempotencyRepository {
    async fn lookup(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError> {
        let records = self.lock();
        let Some(record) = records.get(&(*query.key.as_uuid(), query.mutation_type)) else {
            return Ok(IdempotencyLookupResult::NotFound);
        };
        if record.user_id == query.user_id && record.payload_hash == query.payload_hash {
            Ok(IdempotencyLookupResult::MatchingPayload(record.clone()))
        } else {
            Ok(IdempotencyLookupResult::ConflictingPayload(record.clone()))
        }
    }

    async fn store(&self, record: &IdempotencyRecord) -> Result<(), IdempotencyRepositoryError> {
        let mut records = self.lock();
        let key = (*record.key.as_uuid(), record.mutation_type);
        if records.contains_key(&key) {
            return Err(IdempotencyRepositoryError::DuplicateKey {
                message: record.key.to_string(),
            });
        }
        records.insert(key, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdempotencyKey, canonicalize_and_hash};
    use chrono::Utc;
    use serde_json::json;

    fn record(key: IdempotencyKey, user_id: Uuid, payload: &serde_json::Value) -> IdempotencyRecord {
        IdempotencyRecord {
            key,
            mutation_type: MutationType::Deals,
            payload_hash: canonicalize_and_hash(payload).expect("hashable payload"),
            response_snapshot: json!({"dealId": Uuid::new_v4()}),
            user_id,
            created_at: Utc::now(),
        }
    }

    fn query(
        key: &IdempotencyKey,
        user_id: Uuid,
        payload: &serde_json::Value,
    ) -> IdempotencyLookupQuery {
        IdempotencyLookupQuery::new(
            key.clone(),
            user_id,
            MutationType::Deals,
            canonicalize_and_hash(payload).expect("hashable payload"),
        )
    }

    #[tokio::test]
    async fn fixture_lookup_returns_not_found_for_fresh_keys() {
        let repo = FixtureIdempotencyRepository::default();
        let result = repo
            .lookup(&query(
                &IdempotencyKey::random(),
                Uuid::new_v4(),
                &json!({"amount": 1}),
            ))
            .await
            .expect("lookup succeeds");
        assert!(matches!(result, IdempotencyLookupResult::NotFound));
    }

    #[tokio::test]
    async fn fixture_matches_an_honest_retry() {
        let repo = FixtureIdempotencyRepository::default();
        let key = IdempotencyKey::random();
        let user = Uuid::new_v4();
        let payload = json!({"amount": 100});
        repo.store(&record(key.clone(), user, &payload))
            .await
            .expect("store succeeds");

        let result = repo
            .lookup(&query(&key, user, &payload))
            .await
            .expect("lookup succeeds");
        assert!(matches!(result, IdempotencyLookupResult::MatchingPayload(_)));
    }

    #[tokio::test]
    async fn fixture_flags_key_reuse_with_a_different_payload() {
        let repo = FixtureIdempotencyRepository::default();
        let key = IdempotencyKey::random();
        let user = Uuid::new_v4();
        repo.store(&record(key.clone(), user, &json!({"amount": 100})))
            .await
            .expect("store succeeds");

        let result = repo
            .lookup(&query(&key, user, &json!({"amount": 200})))
            .await
            .expect("lookup succeeds");
        assert!(matches!(
            result,
            IdempotencyLookupResult::ConflictingPayload(_)
        ));
    }

    #[tokio::test]
    async fn fixture_flags_key_reuse_by_another_user() {
        let repo = FixtureIdempotencyRepository::default();
        let key = IdempotencyKey::random();
        let payload = json!({"amount": 100});
        repo.store(&record(key.clone(), Uuid::new_v4(), &payload))
            .await
            .expect("store succeeds");

        let result = repo
            .lookup(&query(&key, Uuid::new_v4(), &payload))
            .await
            .expect("lookup succeeds");
        assert!(matches!(
            result,
            IdempotencyLookupResult::ConflictingPayload(_)
        ));
    }

    #[tokio::test]
    async fn fixture_store_rejects_duplicate_keys() {
        let repo = FixtureIdempotencyRepository::default();
        let key = IdempotencyKey::random();
        let payload = json!({"amount": 100});
        repo.store(&record(key.clone(), Uuid::new_v4(), &payload))
            .await
            .expect("first store succeeds");

        let err = repo
            .store(&record(key, Uuid::new_v4(), &payload))
            .await
            .expect_err("duplicate key");
        assert!(matches!(
            err,
            IdempotencyRepositoryError::DuplicateKey { .. }
        ));
    }
}

//! PostgreSQL-backed `IdempotencyRepository` implementation using Diesel ORM.
//!
//! Lookups fetch by `(key, mutation_type)` alone and compare the owner and
//! payload hash in code, so a conflicting reuse of a key is reported rather
//! than silently missed.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdempotencyRepository, IdempotencyRepositoryError};
use crate::domain::{
    IdempotencyKey, IdempotencyLookupQuery, IdempotencyLookupResult, IdempotencyRecord,
    MutationType, PayloadHash,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IdempotencyKeyRow, NewIdempotencyKeyRow};
use super::pool::{DbPool, PoolError};
use super::schema::idempotency_keys;

/// Diesel-backed implementation of the idempotency repository port.
#[derive(Clone)]
pub struct DieselIdempotencyRepository {
    pool: DbPool,
}

impl DieselIdempotencyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdempotencyRepositoryError {
    map_basic_pool_error(error, |message| IdempotencyRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> IdempotencyRepositoryError {
    map_basic_diesel_error(
        error,
        |message| IdempotencyRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| IdempotencyRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Map store errors, surfacing unique violations as duplicate keys.
fn map_store_error(
    error: diesel::result::Error,
    key: &IdempotencyKey,
) -> IdempotencyRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if matches!(
        &error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        return IdempotencyRepositoryError::DuplicateKey {
            message: key.to_string(),
        };
    }
    map_diesel_error(error)
}

/// Convert a database row into a domain idempotency record.
fn row_to_record(row: IdempotencyKeyRow) -> Result<IdempotencyRecord, IdempotencyRepositoryError> {
    let serialization = |message: String| IdempotencyRepositoryError::Serialization { message };

    let mutation_type =
        MutationType::from_str(&row.mutation_type).map_err(|err| serialization(err.to_string()))?;
    let payload_hash = PayloadHash::try_from_bytes(&row.payload_hash)
        .map_err(|err| serialization(err.to_string()))?;

    Ok(IdempotencyRecord {
        key: IdempotencyKey::from_uuid(row.key),
        mutation_type,
        payload_hash,
        response_snapshot: row.response_snapshot,
        user_id: row.user_id,
        created_at: row.created_at,
    })
}

#[async_trait]
impl IdempotencyRepository for DieselIdempotencyRepository {
    async fn lookup(
        &self,
        query: &IdempotencyLookupQuery,
    ) -> Result<IdempotencyLookupResult, IdempotencyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = idempotency_keys::table
            .filter(
                idempotency_keys::key
                    .eq(query.key.as_uuid())
                    .and(idempotency_keys::mutation_type.eq(query.mutation_type.as_str())),
            )
            .select(IdempotencyKeyRow::as_select())
            .first::<IdempotencyKeyRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(IdempotencyLookupResult::NotFound);
        };

        let record = row_to_record(row)?;
        if record.user_id == query.user_id && record.payload_hash == query.payload_hash {
            Ok(IdempotencyLookupResult::MatchingPayload(record))
        } else {
            Ok(IdempotencyLookupResult::ConflictingPayload(record))
        }
    }

    async fn store(&self, record: &IdempotencyRecord) -> Result<(), IdempotencyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewIdempotencyKeyRow {
            key: *record.key.as_uuid(),
            user_id: record.user_id,
            mutation_type: record.mutation_type.as_str(),
            payload_hash: record.payload_hash.as_bytes(),
            response_snapshot: &record.response_snapshot,
            created_at: record.created_at,
        };

        diesel::insert_into(idempotency_keys::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_store_error(err, &record.key))
    }
}

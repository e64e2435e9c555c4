//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! This adapter persists user accounts and role sets, loading rows back
//! through validated domain constructors.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{CivicId, User, UserRole};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::Connection { message })
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        |message| UserRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| UserRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Map insert errors, surfacing unique violations as duplicate civic ids.
///
/// The only unique constraint on the users table is the civic id index, so a
/// unique violation here is unambiguous.
fn map_insert_error(error: diesel::result::Error, civic_id: &CivicId) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if matches!(
        &error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        return UserRepositoryError::DuplicateCivicId {
            civic_id: civic_id.to_string(),
        };
    }
    map_diesel_error(error)
}

fn decode_roles(roles: Vec<String>) -> Result<Vec<UserRole>, UserRepositoryError> {
    roles
        .iter()
        .map(|role| UserRole::from_str(role))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| UserRepositoryError::Corrupt {
            message: err.to_string(),
        })
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let roles = decode_roles(row.active_roles)?;
    User::try_from_strings(row.id, &row.civic_id, row.email, row.name, roles).map_err(|err| {
        UserRepositoryError::Corrupt {
            message: err.to_string(),
        }
    })
}

fn encode_roles(roles: &[UserRole]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_owned()).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_civic_id(
        &self,
        civic_id: &CivicId,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::civic_id.eq(civic_id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: user.id(),
            civic_id: user.civic_id().as_ref(),
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            active_roles: encode_roles(user.active_roles()),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, user.civic_id()))
    }

    async fn update_roles(
        &self,
        civic_id: &CivicId,
        roles: &[UserRole],
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(users::table.filter(users::civic_id.eq(civic_id.as_ref())))
            .set((
                users::active_roles.eq(encode_roles(roles)),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserRow::as_select())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

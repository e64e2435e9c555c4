//! Port for user identity persistence.
//!
//! The [`UserRepository`] trait defines the contract for storing platform
//! users and their active role sets. Adapters implement this trait to provide
//! durable storage (e.g., PostgreSQL) keyed both by internal UUID and by the
//! external civic id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CivicId, User, UserRole};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// Another user already claims this civic id.
    #[error("civic id '{civic_id}' is already registered")]
    DuplicateCivicId {
        /// The contested civic id.
        civic_id: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored user failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for user storage and retrieval.
///
/// The civic id is the external lookup key used by persona endpoints; the
/// UUID is the internal join key used by profile and activity tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by external civic id.
    ///
    /// Returns `None` when no user has registered under this civic id.
    async fn find_by_civic_id(
        &self,
        civic_id: &CivicId,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by internal id.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new user.
    ///
    /// Fails with [`UserRepositoryError::DuplicateCivicId`] when the civic id
    /// is already registered.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace the active role set of the user with this civic id.
    ///
    /// Returns the updated user, or `None` when the civic id is unknown.
    /// Role-set validation (no duplicates) happens in the domain before this
    /// call; the repository persists what it is given.
    async fn update_roles(
        &self,
        civic_id: &CivicId,
        roles: &[UserRole],
    ) -> Result<Option<User>, UserRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
///
/// Behaves like a real adapter (inserts persist, duplicate civic ids are
/// rejected) so suites that run without a database still exercise repository
/// semantics.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl FixtureUserRepository {
    /// Pre-load a user, replacing any previous entry with the same id.
    pub fn seed(&self, user: User) {
        self.lock().insert(user.id(), user);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_civic_id(
        &self,
        civic_id: &CivicId,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .lock()
            .values()
            .find(|user| user.civic_id() == civic_id)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().get(&user_id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.lock();
        if users
            .values()
            .any(|existing| existing.civic_id() == user.civic_id())
        {
            return Err(UserRepositoryError::DuplicateCivicId {
                civic_id: user.civic_id().to_string(),
            });
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update_roles(
        &self,
        civic_id: &CivicId,
        roles: &[UserRole],
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut users = self.lock();
        let Some(existing) = users.values().find(|user| user.civic_id() == civic_id) else {
            return Ok(None);
        };
        let updated = existing
            .clone()
            .with_roles(roles.to_vec())
            .map_err(|err| UserRepositoryError::Corrupt {
                message: err.to_string(),
            })?;
        users.insert(updated.id(), updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(civic_id: &str) -> User {
        User::try_from_strings(
            Uuid::new_v4(),
            civic_id,
            "ada@example.com",
            "Ada Lovelace",
            vec![UserRole::Founder],
        )
        .expect("valid user")
    }

    #[tokio::test]
    async fn fixture_round_trips_a_user_by_civic_id() {
        let repo = FixtureUserRepository::default();
        let user = user("civic-1");
        repo.insert(&user).await.expect("insert succeeds");

        let found = repo
            .find_by_civic_id(user.civic_id())
            .await
            .expect("lookup succeeds");
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn fixture_rejects_duplicate_civic_ids() {
        let repo = FixtureUserRepository::default();
        repo.insert(&user("civic-1")).await.expect("first insert");

        let err = repo
            .insert(&user("civic-1"))
            .await
            .expect_err("duplicate civic id");
        assert!(matches!(err, UserRepositoryError::DuplicateCivicId { .. }));
    }

    #[tokio::test]
    async fn fixture_updates_roles_for_known_users() {
        let repo = FixtureUserRepository::default();
        let user = user("civic-1");
        repo.insert(&user).await.expect("insert succeeds");

        let updated = repo
            .update_roles(user.civic_id(), &[UserRole::Founder, UserRole::Investor])
            .await
            .expect("update succeeds")
            .expect("user exists");
        assert!(updated.has_role(UserRole::Investor));
    }

    #[tokio::test]
    async fn fixture_update_roles_returns_none_for_unknown_users() {
        let repo = FixtureUserRepository::default();
        let civic_id = CivicId::new("civic-unknown").expect("valid civic id");

        let updated = repo
            .update_roles(&civic_id, &[UserRole::Jobseeker])
            .await
            .expect("update succeeds");
        assert!(updated.is_none());
    }
}

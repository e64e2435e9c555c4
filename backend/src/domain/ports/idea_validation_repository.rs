//! Port for idea validation persistence.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::IdeaValidation;

/// Errors raised by idea validation repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdeaValidationRepositoryError {
    /// Repository connection could not be established.
    #[error("idea validation repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("idea validation repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored idea validation failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for idea validation storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdeaValidationRepository: Send + Sync {
    /// Insert a new assessment.
    async fn insert(
        &self,
        validation: &IdeaValidation,
    ) -> Result<(), IdeaValidationRepositoryError>;

    /// List assessments submitted by `user_id`, oldest first.
    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<IdeaValidation>, IdeaValidationRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded vector.
///
/// Insertion order stands in for the submission timestamps a real adapter
/// orders by.
#[derive(Debug, Default)]
pub struct FixtureIdeaValidationRepository {
    validations: Mutex<Vec<IdeaValidation>>,
}

impl FixtureIdeaValidationRepository {
    fn lock(&self) -> MutexGuard<'_, Vec<IdeaValidation>> {
        self.validations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdeaValidationRepository for FixtureIdeaValidationRepository {
    async fn insert(
        &self,
        validation: &IdeaValidation,
    ) -> Result<(), IdeaValidationRepositoryError> {
        self.lock().push(validation.clone());
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<IdeaValidation>, IdeaValidationRepositoryError> {
        Ok(self
            .lock()
            .iter()
            .filter(|validation| validation.user_id() == user_id)
            .cloned()
            .collect())
    }
}

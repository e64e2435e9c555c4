//! Port for job application persistence.
//!
//! Status updates use compare-and-set semantics: the caller states the status
//! it read, and the update only lands if that status still holds. Concurrent
//! reviewers therefore cannot silently overwrite each other's decisions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Application, ApplicationStatus};

/// Errors raised by application repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationRepositoryError {
    /// Repository connection could not be established.
    #[error("application repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("application repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// Compare-and-set failed: the stored status no longer matches.
    #[error("application status changed concurrently (now '{actual}')")]
    StaleStatus {
        /// The status currently stored.
        actual: ApplicationStatus,
    },
    /// A stored row failed domain validation on load.
    #[error("stored application failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for application storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new application.
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError>;

    /// Fetch an application by id.
    async fn find_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// List applications against any of the given postings, ordered by id.
    ///
    /// Company-level listings resolve the company's posting ids first and
    /// pass them here, keeping this port free of posting semantics.
    async fn list_by_postings(
        &self,
        posting_ids: &[Uuid],
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// List applications submitted by `jobseeker_id`, ordered by id.
    async fn list_by_jobseeker(
        &self,
        jobseeker_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// Move an application to `next` if its status still equals `expected`.
    ///
    /// Returns the updated application, `None` when the id is unknown, or
    /// [`ApplicationRepositoryError::StaleStatus`] when a concurrent update
    /// got there first.
    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureApplicationRepository {
    applications: Mutex<HashMap<Uuid, Application>>,
}

impl FixtureApplicationRepository {
    /// Pre-load an application, replacing any previous entry with the same id.
    pub fn seed(&self, application: Application) {
        self.lock().insert(application.id(), application);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Application>> {
        self.applications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn sorted_by_id(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by_key(Application::id);
    applications
}

#[async_trait]
impl ApplicationRepository for FixtureApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        self.lock().insert(application.id(), application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(self.lock().get(&application_id).cloned())
    }

    async fn list_by_postings(
        &self,
        posting_ids: &[Uuid],
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let applications = self
            .lock()
            .values()
            .filter(|application| posting_ids.contains(&application.job_posting_id()))
            .cloned()
            .collect();
        Ok(sorted_by_id(applications))
    }

    async fn list_by_jobseeker(
        &self,
        jobseeker_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let applications = self
            .lock()
            .values()
            .filter(|application| application.jobseeker_id() == jobseeker_id)
            .cloned()
            .collect();
        Ok(sorted_by_id(applications))
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut applications = self.lock();
        let Some(existing) = applications.get(&application_id) else {
            return Ok(None);
        };
        if existing.status() != expected {
            return Err(ApplicationRepositoryError::StaleStatus {
                actual: existing.status(),
            });
        }
        let updated = existing.clone().with_status(next);
        applications.insert(application_id, updated.clone());
        Ok(Some(updated))
    }
}

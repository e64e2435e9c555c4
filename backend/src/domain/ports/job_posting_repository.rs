//! Port for job posting persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{JobPosting, PostingStatus};

/// Errors raised by job posting repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobPostingRepositoryError {
    /// Repository connection could not be established.
    #[error("job posting repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("job posting repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored job posting failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for job posting storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobPostingRepository: Send + Sync {
    /// Insert a new job posting.
    async fn insert(&self, posting: &JobPosting) -> Result<(), JobPostingRepositoryError>;

    /// Fetch a posting by id.
    async fn find_by_id(
        &self,
        posting_id: Uuid,
    ) -> Result<Option<JobPosting>, JobPostingRepositoryError>;

    /// List postings advertised by `company_id`, ordered by title.
    async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<JobPosting>, JobPostingRepositoryError>;

    /// List up to `limit` open postings across all companies, ordered by
    /// title. Backs the jobseeker-facing browse surfaces.
    async fn list_open(&self, limit: usize)
    -> Result<Vec<JobPosting>, JobPostingRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureJobPostingRepository {
    postings: Mutex<HashMap<Uuid, JobPosting>>,
}

impl FixtureJobPostingRepository {
    /// Pre-load a posting, replacing any previous entry with the same id.
    pub fn seed(&self, posting: JobPosting) {
        self.lock().insert(posting.id(), posting);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, JobPosting>> {
        self.postings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobPostingRepository for FixtureJobPostingRepository {
    async fn insert(&self, posting: &JobPosting) -> Result<(), JobPostingRepositoryError> {
        self.lock().insert(posting.id(), posting.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        posting_id: Uuid,
    ) -> Result<Option<JobPosting>, JobPostingRepositoryError> {
        Ok(self.lock().get(&posting_id).cloned())
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<JobPosting>, JobPostingRepositoryError> {
        let mut postings: Vec<_> = self
            .lock()
            .values()
            .filter(|posting| posting.company_id() == company_id)
            .cloned()
            .collect();
        postings.sort_by(|a, b| a.title().cmp(b.title()).then(a.id().cmp(&b.id())));
        Ok(postings)
    }

    async fn list_open(
        &self,
        limit: usize,
    ) -> Result<Vec<JobPosting>, JobPostingRepositoryError> {
        let mut postings: Vec<_> = self
            .lock()
            .values()
            .filter(|posting| posting.status() == PostingStatus::Open)
            .cloned()
            .collect();
        postings.sort_by(|a, b| a.title().cmp(b.title()).then(a.id().cmp(&b.id())));
        postings.truncate(limit);
        Ok(postings)
    }
}

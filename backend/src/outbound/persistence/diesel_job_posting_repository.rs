//! PostgreSQL-backed `JobPostingRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{JobPostingRepository, JobPostingRepositoryError};
use crate::domain::{JobPosting, JobPostingDraft, PostingStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{JobPostingRow, NewJobPostingRow};
use super::pool::{DbPool, PoolError};
use super::schema::job_postings;

/// Diesel-backed implementation of the job posting repository port.
#[derive(Clone)]
pub struct DieselJobPostingRepository {
    pool: DbPool,
}

impl DieselJobPostingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JobPostingRepositoryError {
    map_basic_pool_error(error, |message| JobPostingRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> JobPostingRepositoryError {
    map_basic_diesel_error(
        error,
        |message| JobPostingRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| JobPostingRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Convert a database row into a validated domain posting.
fn row_to_posting(row: JobPostingRow) -> Result<JobPosting, JobPostingRepositoryError> {
    let status =
        PostingStatus::from_str(&row.status).map_err(|err| JobPostingRepositoryError::Corrupt {
            message: err.to_string(),
        })?;

    JobPosting::new(JobPostingDraft {
        id: row.id,
        company_id: row.company_id,
        title: row.title,
        skills_required: row.skills_required,
        status,
    })
    .map_err(|err| JobPostingRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

#[async_trait]
impl JobPostingRepository for DieselJobPostingRepository {
    async fn insert(&self, posting: &JobPosting) -> Result<(), JobPostingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewJobPostingRow {
            id: posting.id(),
            company_id: posting.company_id(),
            title: posting.title(),
            skills_required: posting.skills_required().to_vec(),
            status: posting.status().as_str(),
        };

        diesel::insert_into(job_postings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        posting_id: Uuid,
    ) -> Result<Option<JobPosting>, JobPostingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = job_postings::table
            .filter(job_postings::id.eq(posting_id))
            .select(JobPostingRow::as_select())
            .first::<JobPostingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_posting).transpose()
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<JobPosting>, JobPostingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<JobPostingRow> = job_postings::table
            .filter(job_postings::company_id.eq(company_id))
            .order((job_postings::title.asc(), job_postings::id.asc()))
            .select(JobPostingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_posting).collect()
    }

    async fn list_open(
        &self,
        limit: usize,
    ) -> Result<Vec<JobPosting>, JobPostingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<JobPostingRow> = job_postings::table
            .filter(job_postings::status.eq(PostingStatus::Open.as_str()))
            .order((job_postings::title.asc(), job_postings::id.asc()))
            .limit(limit)
            .select(JobPostingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_posting).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Backend Engineer".to_owned(),
            skills_required: vec!["Rust".to_owned()],
            status: "open".to_owned(),
        }
    }

    #[rstest]
    fn row_converts_to_domain_posting(valid_row: JobPostingRow) {
        let posting = row_to_posting(valid_row).expect("row converts");
        assert_eq!(posting.title(), "Backend Engineer");
        assert_eq!(posting.status(), PostingStatus::Open);
    }

    #[rstest]
    fn row_with_unknown_status_maps_to_corrupt(mut valid_row: JobPostingRow) {
        valid_row.status = "archived".to_owned();
        let err = row_to_posting(valid_row).expect_err("unknown status rejected");
        assert!(matches!(err, JobPostingRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn row_with_blank_title_maps_to_corrupt(mut valid_row: JobPostingRow) {
        valid_row.title = String::new();
        let err = row_to_posting(valid_row).expect_err("blank title rejected");
        assert!(matches!(err, JobPostingRepositoryError::Corrupt { .. }));
    }
}

//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Status updates are compare-and-set: the `UPDATE` is filtered on both the
//! application id and the expected status, so a concurrent reviewer's write
//! makes the filter miss instead of being overwritten. A follow-up read then
//! distinguishes an unknown id from a stale expectation.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{Application, ApplicationDraft, ApplicationStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::applications;

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, |message| ApplicationRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ApplicationRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| ApplicationRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

fn parse_status(status: &str) -> Result<ApplicationStatus, ApplicationRepositoryError> {
    ApplicationStatus::from_str(status).map_err(|err| ApplicationRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

/// Convert a database row into a validated domain application.
fn row_to_application(row: ApplicationRow) -> Result<Application, ApplicationRepositoryError> {
    let status = parse_status(&row.status)?;

    Application::new(ApplicationDraft {
        id: row.id,
        job_posting_id: row.job_posting_id,
        jobseeker_id: row.jobseeker_id,
        status,
        cover_letter: row.cover_letter,
    })
    .map_err(|err| ApplicationRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewApplicationRow {
            id: application.id(),
            job_posting_id: application.job_posting_id(),
            jobseeker_id: application.jobseeker_id(),
            status: application.status().as_str(),
            cover_letter: application.cover_letter(),
        };

        diesel::insert_into(applications::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = applications::table
            .filter(applications::id.eq(application_id))
            .select(ApplicationRow::as_select())
            .first::<ApplicationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_application).transpose()
    }

    async fn list_by_postings(
        &self,
        posting_ids: &[Uuid],
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        if posting_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ApplicationRow> = applications::table
            .filter(applications::job_posting_id.eq_any(posting_ids))
            .order(applications::id.asc())
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_application).collect()
    }

    async fn list_by_jobseeker(
        &self,
        jobseeker_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ApplicationRow> = applications::table
            .filter(applications::jobseeker_id.eq(jobseeker_id))
            .order(applications::id.asc())
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_application).collect()
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            applications::table.filter(
                applications::id
                    .eq(application_id)
                    .and(applications::status.eq(expected.as_str())),
            ),
        )
        .set(applications::status.eq(next.as_str()))
        .returning(ApplicationRow::as_select())
        .get_result::<ApplicationRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return row_to_application(row).map(Some);
        }

        // The filter missed: either the id is unknown or the status moved.
        let current = applications::table
            .filter(applications::id.eq(application_id))
            .select(ApplicationRow::as_select())
            .first::<ApplicationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match current {
            None => Ok(None),
            Some(row) => Err(ApplicationRepositoryError::StaleStatus {
                actual: parse_status(&row.status)?,
            }),
        }
    }
}

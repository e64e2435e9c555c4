//! PostgreSQL-backed `CompanyRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CompanyRepository, CompanyRepositoryError};
use crate::domain::{Company, CompanyDraft, FundingStage};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CompanyRow, NewCompanyRow};
use super::pool::{DbPool, PoolError};
use super::schema::companies;

/// Diesel-backed implementation of the company repository port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CompanyRepositoryError {
    map_basic_pool_error(error, |message| CompanyRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> CompanyRepositoryError {
    map_basic_diesel_error(
        error,
        |message| CompanyRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| CompanyRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Convert a database row into a validated domain company.
fn row_to_company(row: CompanyRow) -> Result<Company, CompanyRepositoryError> {
    let stage =
        FundingStage::from_str(&row.stage).map_err(|err| CompanyRepositoryError::Corrupt {
            message: err.to_string(),
        })?;

    Company::new(CompanyDraft {
        id: row.id,
        founder_id: row.founder_id,
        name: row.name,
        industry: row.industry,
        stage,
        valuation: row.valuation,
    })
    .map_err(|err| CompanyRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

fn rows_to_companies(rows: Vec<CompanyRow>) -> Result<Vec<Company>, CompanyRepositoryError> {
    rows.into_iter().map(row_to_company).collect()
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCompanyRow {
            id: company.id(),
            founder_id: company.founder_id(),
            name: company.name(),
            industry: company.industry(),
            stage: company.stage().as_str(),
            valuation: company.valuation(),
        };

        diesel::insert_into(companies::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        company_id: Uuid,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = companies::table
            .filter(companies::id.eq(company_id))
            .select(CompanyRow::as_select())
            .first::<CompanyRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_company).transpose()
    }

    async fn list_by_founder(
        &self,
        founder_id: Uuid,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CompanyRow> = companies::table
            .filter(companies::founder_id.eq(founder_id))
            .order((companies::name.asc(), companies::id.asc()))
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_companies(rows)
    }

    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CompanyRow> = companies::table
            .order((companies::name.asc(), companies::id.asc()))
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_companies(rows)
    }
}

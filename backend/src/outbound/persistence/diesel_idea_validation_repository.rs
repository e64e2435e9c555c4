//! PostgreSQL-backed `IdeaValidationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{IdeaValidationRepository, IdeaValidationRepositoryError};
use crate::domain::{IdeaValidation, IdeaValidationDraft};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IdeaValidationRow, NewIdeaValidationRow};
use super::pool::{DbPool, PoolError};
use super::schema::idea_validations;

/// Diesel-backed implementation of the idea validation repository port.
#[derive(Clone)]
pub struct DieselIdeaValidationRepository {
    pool: DbPool,
}

impl DieselIdeaValidationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdeaValidationRepositoryError {
    map_basic_pool_error(error, |message| IdeaValidationRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> IdeaValidationRepositoryError {
    map_basic_diesel_error(
        error,
        |message| IdeaValidationRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| IdeaValidationRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Convert a database row into a validated domain assessment.
fn row_to_validation(
    row: IdeaValidationRow,
) -> Result<IdeaValidation, IdeaValidationRepositoryError> {
    IdeaValidation::new(IdeaValidationDraft {
        id: row.id,
        user_id: row.user_id,
        company_id: row.company_id,
        idea_text: row.idea_text,
        score: row.score,
        validation_result: row.validation_result,
    })
    .map_err(|err| IdeaValidationRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

#[async_trait]
impl IdeaValidationRepository for DieselIdeaValidationRepository {
    async fn insert(
        &self,
        validation: &IdeaValidation,
    ) -> Result<(), IdeaValidationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewIdeaValidationRow {
            id: validation.id(),
            user_id: validation.user_id(),
            company_id: validation.company_id(),
            idea_text: validation.idea_text(),
            score: validation.score(),
            validation_result: validation.validation_result(),
        };

        diesel::insert_into(idea_validations::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<IdeaValidation>, IdeaValidationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<IdeaValidationRow> = idea_validations::table
            .filter(idea_validations::user_id.eq(user_id))
            .order((idea_validations::created_at.asc(), idea_validations::id.asc()))
            .select(IdeaValidationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_validation).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> IdeaValidationRow {
        IdeaValidationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_id: None,
            idea_text: "Marketplace for reclaimed timber with verified provenance.".to_owned(),
            score: 72,
            validation_result: "strong".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_converts_to_domain_validation(valid_row: IdeaValidationRow) {
        let validation = row_to_validation(valid_row).expect("row converts");
        assert_eq!(validation.score(), 72);
    }

    #[rstest]
    fn row_with_out_of_range_score_maps_to_corrupt(mut valid_row: IdeaValidationRow) {
        valid_row.score = 250;
        let err = row_to_validation(valid_row).expect_err("score rejected");
        assert!(matches!(err, IdeaValidationRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn row_with_blank_idea_text_maps_to_corrupt(mut valid_row: IdeaValidationRow) {
        valid_row.idea_text = "  ".to_owned();
        let err = row_to_validation(valid_row).expect_err("blank text rejected");
        assert!(matches!(err, IdeaValidationRepositoryError::Corrupt { .. }));
    }
}

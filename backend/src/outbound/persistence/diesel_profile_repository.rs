//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.
//!
//! One adapter covers all three persona profile tables. Writes use
//! `INSERT ... ON CONFLICT DO UPDATE` so upserts stay a single round trip.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{
    ExperienceLevel, FounderProfile, FounderProfileDraft, FundingStage, InvestorProfile,
    InvestorProfileDraft, JobseekerProfile, JobseekerProfileDraft,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    FounderProfileRow, FounderProfileUpsert, InvestorProfileRow, InvestorProfileUpsert,
    JobseekerProfileRow, JobseekerProfileUpsert,
};
use super::pool::{DbPool, PoolError};
use super::schema::{founder_profiles, investor_profiles, jobseeker_profiles};

/// Diesel-backed implementation of the profile repository port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    map_basic_pool_error(error, |message| ProfileRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ProfileRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| ProfileRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

fn corrupt(err: impl std::fmt::Display) -> ProfileRepositoryError {
    ProfileRepositoryError::Corrupt {
        message: err.to_string(),
    }
}

/// Convert a database row into a validated founder profile.
fn row_to_founder(row: FounderProfileRow) -> Result<FounderProfile, ProfileRepositoryError> {
    FounderProfile::new(FounderProfileDraft {
        user_id: row.user_id,
        company_count: row.company_count,
        cofounders: row.cofounders,
        bio: row.bio,
        achievements: row.achievements,
    })
    .map_err(corrupt)
}

/// Convert a database row into a validated investor profile.
fn row_to_investor(row: InvestorProfileRow) -> Result<InvestorProfile, ProfileRepositoryError> {
    let preferred_stages = row
        .preferred_stages
        .iter()
        .map(|stage| FundingStage::from_str(stage))
        .collect::<Result<Vec<_>, _>>()
        .map_err(corrupt)?;

    InvestorProfile::new(InvestorProfileDraft {
        user_id: row.user_id,
        firm_name: row.firm_name,
        check_size_min: row.check_size_min,
        check_size_max: row.check_size_max,
        preferred_stages,
        preferred_industries: row.preferred_industries,
    })
    .map_err(corrupt)
}

/// Convert a database row into a validated jobseeker profile.
fn row_to_jobseeker(row: JobseekerProfileRow) -> Result<JobseekerProfile, ProfileRepositoryError> {
    let experience_level = ExperienceLevel::from_str(&row.experience_level).map_err(corrupt)?;

    JobseekerProfile::new(JobseekerProfileDraft {
        user_id: row.user_id,
        skills: row.skills,
        experience_level,
        resume_url: row.resume_url,
        portfolio_url: row.portfolio_url,
    })
    .map_err(corrupt)
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_founder(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FounderProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = founder_profiles::table
            .filter(founder_profiles::user_id.eq(user_id))
            .select(FounderProfileRow::as_select())
            .first::<FounderProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_founder).transpose()
    }

    async fn upsert_founder(
        &self,
        profile: &FounderProfile,
    ) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let upsert = FounderProfileUpsert {
            user_id: profile.user_id(),
            company_count: profile.company_count(),
            cofounders: profile.cofounders().to_vec(),
            bio: profile.bio(),
            achievements: profile.achievements().to_vec(),
        };

        diesel::insert_into(founder_profiles::table)
            .values(&upsert)
            .on_conflict(founder_profiles::user_id)
            .do_update()
            .set(&upsert)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_investor(
        &self,
        user_id: Uuid,
    ) -> Result<Option<InvestorProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = investor_profiles::table
            .filter(investor_profiles::user_id.eq(user_id))
            .select(InvestorProfileRow::as_select())
            .first::<InvestorProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_investor).transpose()
    }

    async fn upsert_investor(
        &self,
        profile: &InvestorProfile,
    ) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let upsert = InvestorProfileUpsert {
            user_id: profile.user_id(),
            firm_name: profile.firm_name(),
            check_size_min: profile.check_size_min(),
            check_size_max: profile.check_size_max(),
            preferred_stages: profile
                .preferred_stages()
                .iter()
                .map(|stage| stage.as_str().to_owned())
                .collect(),
            preferred_industries: profile.preferred_industries().to_vec(),
        };

        diesel::insert_into(investor_profiles::table)
            .values(&upsert)
            .on_conflict(investor_profiles::user_id)
            .do_update()
            .set(&upsert)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_jobseeker(
        &self,
        user_id: Uuid,
    ) -> Result<Option<JobseekerProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = jobseeker_profiles::table
            .filter(jobseeker_profiles::user_id.eq(user_id))
            .select(JobseekerProfileRow::as_select())
            .first::<JobseekerProfileRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_jobseeker).transpose()
    }

    async fn upsert_jobseeker(
        &self,
        profile: &JobseekerProfile,
    ) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let upsert = JobseekerProfileUpsert {
            user_id: profile.user_id(),
            skills: profile.skills().to_vec(),
            experience_level: profile.experience_level().as_str(),
            resume_url: profile.resume_url(),
            portfolio_url: profile.portfolio_url(),
        };

        diesel::insert_into(jobseeker_profiles::table)
            .values(&upsert)
            .on_conflict(jobseeker_profiles::user_id)
            .do_update()
            .set(&upsert)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn investor_row_with_unknown_stage_maps_to_corrupt() {
        let row = InvestorProfileRow {
            user_id: Uuid::new_v4(),
            firm_name: "Basalt Capital".to_owned(),
            check_size_min: 50_000,
            check_size_max: 500_000,
            preferred_stages: vec!["mezzanine".to_owned()],
            preferred_industries: vec!["DevTools".to_owned()],
        };

        let err = row_to_investor(row).expect_err("unknown stage rejected");
        assert!(matches!(err, ProfileRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn jobseeker_row_with_unknown_level_maps_to_corrupt() {
        let row = JobseekerProfileRow {
            user_id: Uuid::new_v4(),
            skills: vec!["Rust".to_owned()],
            experience_level: "wizard".to_owned(),
            resume_url: None,
            portfolio_url: None,
        };

        let err = row_to_jobseeker(row).expect_err("unknown level rejected");
        assert!(matches!(err, ProfileRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn founder_row_converts_to_domain_profile() {
        let user_id = Uuid::new_v4();
        let row = FounderProfileRow {
            user_id,
            company_count: 2,
            cofounders: vec!["Grace".to_owned()],
            bio: Some("Repeat founder.".to_owned()),
            achievements: vec![],
        };

        let profile = row_to_founder(row).expect("row converts");
        assert_eq!(profile.user_id(), user_id);
        assert_eq!(profile.company_count(), 2);
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(err, ProfileRepositoryError::Connection { .. }));
    }
}

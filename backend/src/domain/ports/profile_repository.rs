//! Port for role-specific profile persistence.
//!
//! One trait covers all three profile kinds because they share semantics:
//! each is keyed by the owning user's id and written with upsert semantics
//! (last write wins, confirmed by a follow-up read in the handlers).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{FounderProfile, InvestorProfile, JobseekerProfile};

/// Errors raised by profile repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileRepositoryError {
    /// Repository connection could not be established.
    #[error("profile repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("profile repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored profile failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for profile storage and retrieval across all three roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the founder profile owned by `user_id`.
    async fn find_founder(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FounderProfile>, ProfileRepositoryError>;

    /// Insert or replace a founder profile.
    async fn upsert_founder(&self, profile: &FounderProfile)
    -> Result<(), ProfileRepositoryError>;

    /// Fetch the investor profile owned by `user_id`.
    async fn find_investor(
        &self,
        user_id: Uuid,
    ) -> Result<Option<InvestorProfile>, ProfileRepositoryError>;

    /// Insert or replace an investor profile.
    async fn upsert_investor(
        &self,
        profile: &InvestorProfile,
    ) -> Result<(), ProfileRepositoryError>;

    /// Fetch the jobseeker profile owned by `user_id`.
    async fn find_jobseeker(
        &self,
        user_id: Uuid,
    ) -> Result<Option<JobseekerProfile>, ProfileRepositoryError>;

    /// Insert or replace a jobseeker profile.
    async fn upsert_jobseeker(
        &self,
        profile: &JobseekerProfile,
    ) -> Result<(), ProfileRepositoryError>;
}

/// In-memory implementation backed by mutex-guarded maps.
#[derive(Debug, Default)]
pub struct FixtureProfileRepository {
    founders: Mutex<HashMap<Uuid, FounderProfile>>,
    investors: Mutex<HashMap<Uuid, InvestorProfile>>,
    jobseekers: Mutex<HashMap<Uuid, JobseekerProfile>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_founder(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FounderProfile>, ProfileRepositoryError> {
        Ok(lock(&self.founders).get(&user_id).cloned())
    }

    async fn upsert_founder(
        &self,
        profile: &FounderProfile,
    ) -> Result<(), ProfileRepositoryError> {
        lock(&self.founders).insert(profile.user_id(), profile.clone());
        Ok(())
    }

    async fn find_investor(
        &self,
        user_id: Uuid,
    ) -> Result<Option<InvestorProfile>, ProfileRepositoryError> {
        Ok(lock(&self.investors).get(&user_id).cloned())
    }

    async fn upsert_investor(
        &self,
        profile: &InvestorProfile,
    ) -> Result<(), ProfileRepositoryError> {
        lock(&self.investors).insert(profile.user_id(), profile.clone());
        Ok(())
    }

    async fn find_jobseeker(
        &self,
        user_id: Uuid,
    ) -> Result<Option<JobseekerProfile>, ProfileRepositoryError> {
        Ok(lock(&self.jobseekers).get(&user_id).cloned())
    }

    async fn upsert_jobseeker(
        &self,
        profile: &JobseekerProfile,
    ) -> Result<(), ProfileRepositoryError> {
        lock(&self.jobseekers).insert(profile.user_id(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FounderProfileDraft;

    fn founder_profile(user_id: Uuid, company_count: i32) -> FounderProfile {
        FounderProfile::new(FounderProfileDraft {
            user_id,
            company_count,
            cofounders: vec![],
            bio: Some("Serial founder.".to_owned()),
            achievements: vec![],
        })
        .expect("valid profile")
    }

    #[tokio::test]
    async fn fixture_round_trips_a_founder_profile() {
        let repo = FixtureProfileRepository::default();
        let user_id = Uuid::new_v4();
        let profile = founder_profile(user_id, 1);

        repo.upsert_founder(&profile).await.expect("upsert");
        let found = repo.find_founder(user_id).await.expect("lookup");
        assert_eq!(found, Some(profile));
    }

    #[tokio::test]
    async fn fixture_upsert_replaces_the_previous_profile() {
        let repo = FixtureProfileRepository::default();
        let user_id = Uuid::new_v4();

        repo.upsert_founder(&founder_profile(user_id, 1))
            .await
            .expect("first upsert");
        repo.upsert_founder(&founder_profile(user_id, 3))
            .await
            .expect("second upsert");

        let found = repo
            .find_founder(user_id)
            .await
            .expect("lookup")
            .expect("profile exists");
        assert_eq!(found.company_count(), 3);
    }

    #[tokio::test]
    async fn fixture_returns_none_for_unknown_users() {
        let repo = FixtureProfileRepository::default();
        let found = repo.find_investor(Uuid::new_v4()).await.expect("lookup");
        assert!(found.is_none());
    }
}

//! Role-specific profile domain services.
//!
//! Fetch resolves the civic id to a user and then the role's profile; both
//! misses are 404s so callers can distinguish "never registered" from
//! "registered but not yet onboarded" by message. Upserts are confirmed by a
//! follow-up read so the response always reflects stored state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ProfileRepository, UserRepository};
use crate::domain::service_support::{map_profile_repo_error, resolve_user};
use crate::domain::{
    CivicId, Error, ExperienceLevel, FounderProfile, FounderProfileDraft, FundingStage,
    InvestorProfile, InvestorProfileDraft, JobseekerProfile, JobseekerProfileDraft,
    ProfileValidationError,
};

/// Founder profile fields as submitted by the client.
#[derive(Debug, Clone)]
pub struct FounderProfileData {
    /// Number of companies founded.
    pub company_count: i32,
    /// Cofounder display names.
    pub cofounders: Vec<String>,
    /// Free-text biography.
    pub bio: Option<String>,
    /// Notable achievements.
    pub achievements: Vec<String>,
}

/// Investor profile fields as submitted by the client.
#[derive(Debug, Clone)]
pub struct InvestorProfileData {
    /// Name of the investment firm.
    pub firm_name: String,
    /// Smallest check written, in whole currency units.
    pub check_size_min: i64,
    /// Largest check written, in whole currency units.
    pub check_size_max: i64,
    /// Funding stages of interest.
    pub preferred_stages: Vec<FundingStage>,
    /// Industries of interest.
    pub preferred_industries: Vec<String>,
}

/// Jobseeker profile fields as submitted by the client.
#[derive(Debug, Clone)]
pub struct JobseekerProfileData {
    /// Skills offered.
    pub skills: Vec<String>,
    /// Seniority band.
    pub experience_level: ExperienceLevel,
    /// Link to a hosted resume.
    pub resume_url: Option<String>,
    /// Link to a portfolio site.
    pub portfolio_url: Option<String>,
}

/// Driving port for profile lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Fetch the founder profile for a civic id.
    async fn fetch_founder(&self, civic_id: &CivicId) -> Result<FounderProfile, Error>;

    /// Fetch the investor profile for a civic id.
    async fn fetch_investor(&self, civic_id: &CivicId) -> Result<InvestorProfile, Error>;

    /// Fetch the jobseeker profile for a civic id.
    async fn fetch_jobseeker(&self, civic_id: &CivicId) -> Result<JobseekerProfile, Error>;
}

/// Driving port for profile upserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Create or replace the founder profile for a civic id.
    async fn upsert_founder(
        &self,
        civic_id: &CivicId,
        data: FounderProfileData,
    ) -> Result<FounderProfile, Error>;

    /// Create or replace the investor profile for a civic id.
    async fn upsert_investor(
        &self,
        civic_id: &CivicId,
        data: InvestorProfileData,
    ) -> Result<InvestorProfile, Error>;

    /// Create or replace the jobseeker profile for a civic id.
    async fn upsert_jobseeker(
        &self,
        civic_id: &CivicId,
        data: JobseekerProfileData,
    ) -> Result<JobseekerProfile, Error>;
}

/// Profile service implementing the driving ports.
#[derive(Clone)]
pub struct ProfileService<U, P> {
    users: Arc<U>,
    profiles: Arc<P>,
}

impl<U, P> ProfileService<U, P> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, profiles: Arc<P>) -> Self {
        Self { users, profiles }
    }
}

fn map_validation_error(error: ProfileValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn missing_profile(kind: &str, civic_id: &CivicId) -> Error {
    Error::not_found(format!("{kind} profile not found for user '{civic_id}'"))
}

#[async_trait]
impl<U, P> ProfileQuery for ProfileService<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    async fn fetch_founder(&self, civic_id: &CivicId) -> Result<FounderProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        self.profiles
            .find_founder(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| missing_profile("founder", civic_id))
    }

    async fn fetch_investor(&self, civic_id: &CivicId) -> Result<InvestorProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        self.profiles
            .find_investor(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| missing_profile("investor", civic_id))
    }

    async fn fetch_jobseeker(&self, civic_id: &CivicId) -> Result<JobseekerProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        self.profiles
            .find_jobseeker(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| missing_profile("jobseeker", civic_id))
    }
}

#[async_trait]
impl<U, P> ProfileCommand for ProfileService<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    async fn upsert_founder(
        &self,
        civic_id: &CivicId,
        data: FounderProfileData,
    ) -> Result<FounderProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        let profile = FounderProfile::new(FounderProfileDraft {
            user_id: user.id(),
            company_count: data.company_count,
            cofounders: data.cofounders,
            bio: data.bio,
            achievements: data.achievements,
        })
        .map_err(map_validation_error)?;

        self.profiles
            .upsert_founder(&profile)
            .await
            .map_err(map_profile_repo_error)?;
        self.profiles
            .find_founder(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| Error::internal("founder profile missing after upsert"))
    }

    async fn upsert_investor(
        &self,
        civic_id: &CivicId,
        data: InvestorProfileData,
    ) -> Result<InvestorProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        let profile = InvestorProfile::new(InvestorProfileDraft {
            user_id: user.id(),
            firm_name: data.firm_name,
            check_size_min: data.check_size_min,
            check_size_max: data.check_size_max,
            preferred_stages: data.preferred_stages,
            preferred_industries: data.preferred_industries,
        })
        .map_err(map_validation_error)?;

        self.profiles
            .upsert_investor(&profile)
            .await
            .map_err(map_profile_repo_error)?;
        self.profiles
            .find_investor(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| Error::internal("investor profile missing after upsert"))
    }

    async fn upsert_jobseeker(
        &self,
        civic_id: &CivicId,
        data: JobseekerProfileData,
    ) -> Result<JobseekerProfile, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        let profile = JobseekerProfile::new(JobseekerProfileDraft {
            user_id: user.id(),
            skills: data.skills,
            experience_level: data.experience_level,
            resume_url: data.resume_url,
            portfolio_url: data.portfolio_url,
        })
        .map_err(map_validation_error)?;

        self.profiles
            .upsert_jobseeker(&profile)
            .await
            .map_err(map_profile_repo_error)?;
        self.profiles
            .find_jobseeker(user.id())
            .await
            .map_err(map_profile_repo_error)?
            .ok_or_else(|| Error::internal("jobseeker profile missing after upsert"))
    }
}

//! Stepped onboarding flow.
//!
//! Role selection happens through the account service; the steps here cover
//! the role's profile fields. Each role defines an ordered list of required
//! field subsets. `validate_step` checks one step and names what is missing;
//! `submit` re-validates every step, activates the role on the user, and
//! writes the role profile in one pass.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{ProfileRepository, UserRepository};
use crate::domain::service_support::{
    map_profile_repo_error, map_user_repo_error, resolve_user, unknown_user_error,
};
use crate::domain::{
    CivicId, Error, ExperienceLevel, FounderProfile, FounderProfileDraft, FundingStage,
    InvestorProfile, InvestorProfileDraft, JobseekerProfile, JobseekerProfileDraft, User, UserRole,
};

/// All profile fields collected across the onboarding steps of every role.
///
/// A single flat shape keeps the wire format forgiving: clients send the
/// fields they have and validation decides per role and step what counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    /// Number of companies founded (founder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_count: Option<i32>,
    /// Cofounder display names (founder).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cofounders: Vec<String>,
    /// Free-text biography (founder).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Notable achievements (founder).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
    /// Investment firm name (investor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
    /// Smallest check written (investor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_size_min: Option<i64>,
    /// Largest check written (investor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_size_max: Option<i64>,
    /// Funding stages of interest (investor).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_stages: Vec<FundingStage>,
    /// Industries of interest (investor).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_industries: Vec<String>,
    /// Skills offered (jobseeker).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    /// Seniority band (jobseeker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    /// Link to a hosted resume (jobseeker, optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Link to a portfolio site (jobseeker, optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
}

/// Outcome of validating one onboarding step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStepValidation {
    /// Role being onboarded.
    pub role: UserRole,
    /// One-based step index.
    pub step: usize,
    /// Always true; invalid steps are reported as request errors.
    pub valid: bool,
}

/// Final onboarding submission.
#[derive(Debug, Clone)]
pub struct OnboardingSubmission {
    /// Civic id of the onboarding user.
    pub civic_id: CivicId,
    /// Role being onboarded.
    pub role: UserRole,
    /// Collected form fields.
    pub form: OnboardingForm,
}

/// The role profile written by a completed onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OnboardingProfile {
    /// Profile written for a founder.
    Founder(FounderProfile),
    /// Profile written for an investor.
    Investor(InvestorProfile),
    /// Profile written for a jobseeker.
    Jobseeker(JobseekerProfile),
}

/// Result of a completed onboarding submission.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    /// The user with the new role activated.
    pub user: User,
    /// The stored role profile.
    pub profile: OnboardingProfile,
}

/// Driving port for the stepped onboarding flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OnboardingFlow: Send + Sync {
    /// Validate one onboarding step for a role.
    async fn validate_step(
        &self,
        role: UserRole,
        step: usize,
        form: OnboardingForm,
    ) -> Result<OnboardingStepValidation, Error>;

    /// Validate every step, activate the role, and store the profile.
    async fn submit(&self, submission: OnboardingSubmission) -> Result<OnboardingOutcome, Error>;
}

/// Ordered required-field subsets per role. One-based step indices map onto
/// these slices.
fn steps_for(role: UserRole) -> &'static [&'static [&'static str]] {
    match role {
        UserRole::Founder => &[&["companyCount"], &["bio"]],
        UserRole::Investor => &[&["firmName"], &["checkSizeMin", "checkSizeMax"]],
        UserRole::Jobseeker => &[&["skills"], &["experienceLevel"]],
    }
}

fn field_present(form: &OnboardingForm, field: &str) -> bool {
    match field {
        "companyCount" => form.company_count.is_some(),
        "bio" => form.bio.as_deref().is_some_and(|bio| !bio.trim().is_empty()),
        "firmName" => form
            .firm_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty()),
        "checkSizeMin" => form.check_size_min.is_some(),
        "checkSizeMax" => form.check_size_max.is_some(),
        "skills" => !form.skills.is_empty(),
        "experienceLevel" => form.experience_level.is_some(),
        _ => false,
    }
}

fn missing_fields(form: &OnboardingForm, required: &[&'static str]) -> Vec<&'static str> {
    required
        .iter()
        .copied()
        .filter(|field| !field_present(form, field))
        .collect()
}

fn check_step(
    role: UserRole,
    step: usize,
    form: &OnboardingForm,
) -> Result<(), Error> {
    let steps = steps_for(role);
    let required = step
        .checked_sub(1)
        .and_then(|index| steps.get(index))
        .ok_or_else(|| {
            Error::invalid_request(format!(
                "step {step} is out of range for role '{role}'"
            ))
            .with_details(json!({ "role": role, "maxStep": steps.len() }))
        })?;

    let missing = missing_fields(form, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(
            Error::invalid_request(format!("step {step} is missing required fields"))
                .with_details(json!({ "role": role, "step": step, "missingFields": missing })),
        )
    }
}

/// Onboarding service implementing the driving port.
#[derive(Clone)]
pub struct OnboardingService<U, P> {
    users: Arc<U>,
    profiles: Arc<P>,
}

impl<U, P> OnboardingService<U, P> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, profiles: Arc<P>) -> Self {
        Self { users, profiles }
    }
}

fn required_field_error(field: &str) -> Error {
    Error::internal(format!("validated field '{field}' is absent"))
}

impl<U, P> OnboardingService<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    async fn store_profile(
        &self,
        user: &User,
        role: UserRole,
        form: OnboardingForm,
    ) -> Result<OnboardingProfile, Error> {
        let map_invalid = |err| Error::invalid_request(format!("{err}"));
        match role {
            UserRole::Founder => {
                let profile = FounderProfile::new(FounderProfileDraft {
                    user_id: user.id(),
                    company_count: form
                        .company_count
                        .ok_or_else(|| required_field_error("companyCount"))?,
                    cofounders: form.cofounders,
                    bio: form.bio,
                    achievements: form.achievements,
                })
                .map_err(map_invalid)?;
                self.profiles
                    .upsert_founder(&profile)
                    .await
                    .map_err(map_profile_repo_error)?;
                Ok(OnboardingProfile::Founder(profile))
            }
            UserRole::Investor => {
                let profile = InvestorProfile::new(InvestorProfileDraft {
                    user_id: user.id(),
                    firm_name: form
                        .firm_name
                        .ok_or_else(|| required_field_error("firmName"))?,
                    check_size_min: form
                        .check_size_min
                        .ok_or_else(|| required_field_error("checkSizeMin"))?,
                    check_size_max: form
                        .check_size_max
                        .ok_or_else(|| required_field_error("checkSizeMax"))?,
                    preferred_stages: form.preferred_stages,
                    preferred_industries: form.preferred_industries,
                })
                .map_err(map_invalid)?;
                self.profiles
                    .upsert_investor(&profile)
                    .await
                    .map_err(map_profile_repo_error)?;
                Ok(OnboardingProfile::Investor(profile))
            }
            UserRole::Jobseeker => {
                let profile = JobseekerProfile::new(JobseekerProfileDraft {
                    user_id: user.id(),
                    skills: form.skills,
                    experience_level: form
                        .experience_level
                        .ok_or_else(|| required_field_error("experienceLevel"))?,
                    resume_url: form.resume_url,
                    portfolio_url: form.portfolio_url,
                })
                .map_err(map_invalid)?;
                self.profiles
                    .upsert_jobseeker(&profile)
                    .await
                    .map_err(map_profile_repo_error)?;
                Ok(OnboardingProfile::Jobseeker(profile))
            }
        }
    }
}

#[async_trait]
impl<U, P> OnboardingFlow for OnboardingService<U, P>
where
    U: UserRepository,
    P: ProfileRepository,
{
    async fn validate_step(
        &self,
        role: UserRole,
        step: usize,
        form: OnboardingForm,
    ) -> Result<OnboardingStepValidation, Error> {
        check_step(role, step, &form)?;
        Ok(OnboardingStepValidation {
            role,
            step,
            valid: true,
        })
    }

    async fn submit(&self, submission: OnboardingSubmission) -> Result<OnboardingOutcome, Error> {
        for step in 1..=steps_for(submission.role).len() {
            check_step(submission.role, step, &submission.form)?;
        }

        let user = resolve_user(self.users.as_ref(), &submission.civic_id).await?;
        let with_role = user.with_role(submission.role);
        let user = self
            .users
            .update_roles(&submission.civic_id, with_role.active_roles())
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| unknown_user_error(&submission.civic_id))?;

        let profile = self
            .store_profile(&user, submission.role, submission.form)
            .await?;
        Ok(OnboardingOutcome { user, profile })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FixtureProfileRepository, FixtureUserRepository};
    use uuid::Uuid;

    fn registered_user(civic_id: &str) -> User {
        User::try_from_strings(Uuid::new_v4(), civic_id, "ada@example.com", "Ada", vec![])
            .expect("valid user")
    }

    fn service_with_user(
        user: &User,
    ) -> OnboardingService<FixtureUserRepository, FixtureProfileRepository> {
        let users = FixtureUserRepository::default();
        users.seed(user.clone());
        OnboardingService::new(Arc::new(users), Arc::new(FixtureProfileRepository::default()))
    }

    fn founder_form() -> OnboardingForm {
        OnboardingForm {
            company_count: Some(1),
            bio: Some("Building developer tools.".to_owned()),
            ..OnboardingForm::default()
        }
    }

    #[tokio::test]
    async fn a_complete_step_validates() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);

        let outcome = service
            .validate_step(UserRole::Founder, 1, founder_form())
            .await
            .expect("step validates");
        assert_eq!(outcome.step, 1);
        assert!(outcome.valid);
    }

    #[tokio::test]
    async fn missing_fields_are_named_in_the_error_details() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);

        let error = service
            .validate_step(UserRole::Investor, 2, OnboardingForm::default())
            .await
            .expect_err("fields missing");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("missing-field details");
        assert_eq!(
            details["missingFields"],
            serde_json::json!(["checkSizeMin", "checkSizeMax"])
        );
    }

    #[tokio::test]
    async fn out_of_range_steps_are_invalid_requests() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);

        for step in [0, 3] {
            let error = service
                .validate_step(UserRole::Founder, step, founder_form())
                .await
                .expect_err("step out of range");
            assert_eq!(error.code(), ErrorCode::InvalidRequest);
        }
    }

    #[tokio::test]
    async fn submit_activates_the_role_and_stores_the_profile() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);

        let outcome = service
            .submit(OnboardingSubmission {
                civic_id: user.civic_id().clone(),
                role: UserRole::Founder,
                form: founder_form(),
            })
            .await
            .expect("submission succeeds");

        assert!(outcome.user.has_role(UserRole::Founder));
        let OnboardingProfile::Founder(profile) = outcome.profile else {
            panic!("expected a founder profile");
        };
        assert_eq!(profile.company_count(), 1);
    }

    #[tokio::test]
    async fn submit_rechecks_every_step() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);
        let mut form = founder_form();
        form.bio = None;

        let error = service
            .submit(OnboardingSubmission {
                civic_id: user.civic_id().clone(),
                role: UserRole::Founder,
                form,
            })
            .await
            .expect_err("second step incomplete");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("missing-field details");
        assert_eq!(details["step"], 2);
    }

    #[tokio::test]
    async fn submit_for_unknown_users_is_not_found() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);

        let error = service
            .submit(OnboardingSubmission {
                civic_id: CivicId::new("civic-ghost").expect("valid civic id"),
                role: UserRole::Founder,
                form: founder_form(),
            })
            .await
            .expect_err("unknown user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn jobseeker_submission_keeps_optional_links() {
        let user = registered_user("civic-1");
        let service = service_with_user(&user);
        let form = OnboardingForm {
            skills: vec!["Rust".to_owned()],
            experience_level: Some(ExperienceLevel::Senior),
            resume_url: Some("https://example.com/resume.pdf".to_owned()),
            ..OnboardingForm::default()
        };

        let outcome = service
            .submit(OnboardingSubmission {
                civic_id: user.civic_id().clone(),
                role: UserRole::Jobseeker,
                form,
            })
            .await
            .expect("submission succeeds");
        let OnboardingProfile::Jobseeker(profile) = outcome.profile else {
            panic!("expected a jobseeker profile");
        };
        assert_eq!(profile.resume_url(), Some("https://example.com/resume.pdf"));
    }
}

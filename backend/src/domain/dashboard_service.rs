//! Persona dashboard aggregation.
//!
//! Dashboards are forgiving by design. A civic id that resolves to no user
//! or no role profile yields an onboarding prompt with empty collections,
//! never an error. Secondary collection fetches run concurrently; when one
//! fails it is logged, named in `degraded`, and replaced by an empty default
//! so one bad table cannot blank the whole dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::community_service::DEFAULT_FEED_LIMIT;
use crate::domain::ports::{
    ApplicationRepository, CommunityRepository, CompanyRepository, DealFlowRepository,
    IdeaValidationRepository, JobPostingRepository, ProfileRepository, UserRepository,
};
use crate::domain::service_support::{map_profile_repo_error, map_user_repo_error};
use crate::domain::{
    Application, CivicId, CommunityPost, Company, DealFlow, Error, FounderProfile, IdeaValidation,
    InvestorProfile, JobPosting, JobseekerProfile, User, UserRole,
};

/// Open postings shown on the jobseeker dashboard.
const OPEN_POSTINGS_LIMIT: usize = 50;

/// Aggregated view for the founder persona.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FounderDashboard {
    /// The resolved user, absent before registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Whether the caller still needs to complete founder onboarding.
    pub onboarding_required: bool,
    /// The founder profile, absent before onboarding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<FounderProfile>,
    /// Companies founded by the caller.
    pub companies: Vec<Company>,
    /// The caller's idea validation history.
    pub validations: Vec<IdeaValidation>,
    /// Recent community posts.
    pub posts: Vec<CommunityPost>,
    /// Names of sections that failed to load and fell back to empty.
    pub degraded: Vec<String>,
}

/// Aggregated view for the investor persona.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestorDashboard {
    /// The resolved user, absent before registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Whether the caller still needs to complete investor onboarding.
    pub onboarding_required: bool,
    /// The investor profile, absent before onboarding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<InvestorProfile>,
    /// The caller's deal pipeline.
    pub deals: Vec<DealFlow>,
    /// Companies available for discovery.
    pub companies: Vec<Company>,
    /// Recent community posts.
    pub posts: Vec<CommunityPost>,
    /// Names of sections that failed to load and fell back to empty.
    pub degraded: Vec<String>,
}

/// Aggregated view for the jobseeker persona.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobseekerDashboard {
    /// The resolved user, absent before registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Whether the caller still needs to complete jobseeker onboarding.
    pub onboarding_required: bool,
    /// The jobseeker profile, absent before onboarding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<JobseekerProfile>,
    /// The caller's submitted applications.
    pub applications: Vec<Application>,
    /// Open postings across all companies.
    pub open_postings: Vec<JobPosting>,
    /// Recent community posts.
    pub posts: Vec<CommunityPost>,
    /// Names of sections that failed to load and fell back to empty.
    pub degraded: Vec<String>,
}

/// Driving port for dashboard reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Assemble the founder dashboard for a civic id.
    async fn founder_dashboard(&self, civic_id: &CivicId) -> Result<FounderDashboard, Error>;

    /// Assemble the investor dashboard for a civic id.
    async fn investor_dashboard(&self, civic_id: &CivicId) -> Result<InvestorDashboard, Error>;

    /// Assemble the jobseeker dashboard for a civic id.
    async fn jobseeker_dashboard(&self, civic_id: &CivicId)
    -> Result<JobseekerDashboard, Error>;
}

/// Repositories the dashboard service reads from.
#[derive(Clone)]
pub struct DashboardPorts {
    /// User lookups by civic id.
    pub users: Arc<dyn UserRepository>,
    /// Role profile lookups.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Company listings.
    pub companies: Arc<dyn CompanyRepository>,
    /// Idea validation history.
    pub validations: Arc<dyn IdeaValidationRepository>,
    /// Community feed.
    pub posts: Arc<dyn CommunityRepository>,
    /// Deal pipelines.
    pub deals: Arc<dyn DealFlowRepository>,
    /// Job postings.
    pub postings: Arc<dyn JobPostingRepository>,
    /// Job applications.
    pub applications: Arc<dyn ApplicationRepository>,
}

/// Dashboard service implementing the driving port.
#[derive(Clone)]
pub struct DashboardService {
    ports: DashboardPorts,
}

impl DashboardService {
    /// Create a new service over the given ports.
    pub fn new(ports: DashboardPorts) -> Self {
        Self { ports }
    }

    async fn resolve_persona(
        &self,
        civic_id: &CivicId,
        role: UserRole,
    ) -> Result<Option<User>, Error> {
        let user = self
            .ports
            .users
            .find_by_civic_id(civic_id)
            .await
            .map_err(map_user_repo_error)?;
        if let Some(user) = &user
            && !user.has_role(role)
        {
            warn!(%civic_id, %role, "dashboard requested for a role the user has not activated");
        }
        Ok(user)
    }
}

/// Collapse a failed section fetch into an empty default, recording its name.
fn section<T, E>(
    result: Result<Vec<T>, E>,
    name: &str,
    degraded: &mut Vec<String>,
) -> Vec<T>
where
    E: std::fmt::Display,
{
    match result {
        Ok(items) => items,
        Err(error) => {
            warn!(section = name, %error, "dashboard section failed, serving empty");
            degraded.push(name.to_owned());
            Vec::new()
        }
    }
}

fn needs_onboarding<P>(user: Option<&User>, profile: Option<&P>, role: UserRole) -> bool {
    match user {
        None => true,
        Some(user) => profile.is_none() || !user.has_role(role),
    }
}

#[async_trait]
impl DashboardQuery for DashboardService {
    async fn founder_dashboard(&self, civic_id: &CivicId) -> Result<FounderDashboard, Error> {
        let Some(user) = self.resolve_persona(civic_id, UserRole::Founder).await? else {
            return Ok(FounderDashboard {
                user: None,
                onboarding_required: true,
                profile: None,
                companies: Vec::new(),
                validations: Vec::new(),
                posts: Vec::new(),
                degraded: Vec::new(),
            });
        };
        let profile = self
            .ports
            .profiles
            .find_founder(user.id())
            .await
            .map_err(map_profile_repo_error)?;

        let (companies, validations, posts) = tokio::join!(
            self.ports.companies.list_by_founder(user.id()),
            self.ports.validations.list_by_user(user.id()),
            self.ports.posts.list_recent(DEFAULT_FEED_LIMIT),
        );
        let mut degraded = Vec::new();
        let companies = section(companies, "companies", &mut degraded);
        let validations = section(validations, "validations", &mut degraded);
        let posts = section(posts, "posts", &mut degraded);

        Ok(FounderDashboard {
            onboarding_required: needs_onboarding(Some(&user), profile.as_ref(), UserRole::Founder),
            user: Some(user),
            profile,
            companies,
            validations,
            posts,
            degraded,
        })
    }

    async fn investor_dashboard(&self, civic_id: &CivicId) -> Result<InvestorDashboard, Error> {
        let Some(user) = self.resolve_persona(civic_id, UserRole::Investor).await? else {
            return Ok(InvestorDashboard {
                user: None,
                onboarding_required: true,
                profile: None,
                deals: Vec::new(),
                companies: Vec::new(),
                posts: Vec::new(),
                degraded: Vec::new(),
            });
        };
        let profile = self
            .ports
            .profiles
            .find_investor(user.id())
            .await
            .map_err(map_profile_repo_error)?;

        let (deals, companies, posts) = tokio::join!(
            self.ports.deals.list_by_investor(user.id()),
            self.ports.companies.list_all(),
            self.ports.posts.list_recent(DEFAULT_FEED_LIMIT),
        );
        let mut degraded = Vec::new();
        let deals = section(deals, "deals", &mut degraded);
        let companies = section(companies, "companies", &mut degraded);
        let posts = section(posts, "posts", &mut degraded);

        Ok(InvestorDashboard {
            onboarding_required: needs_onboarding(
                Some(&user),
                profile.as_ref(),
                UserRole::Investor,
            ),
            user: Some(user),
            profile,
            deals,
            companies,
            posts,
            degraded,
        })
    }

    async fn jobseeker_dashboard(
        &self,
        civic_id: &CivicId,
    ) -> Result<JobseekerDashboard, Error> {
        let Some(user) = self.resolve_persona(civic_id, UserRole::Jobseeker).await? else {
            return Ok(JobseekerDashboard {
                user: None,
                onboarding_required: true,
                profile: None,
                applications: Vec::new(),
                open_postings: Vec::new(),
                posts: Vec::new(),
                degraded: Vec::new(),
            });
        };
        let profile = self
            .ports
            .profiles
            .find_jobseeker(user.id())
            .await
            .map_err(map_profile_repo_error)?;

        let (applications, open_postings, posts) = tokio::join!(
            self.ports.applications.list_by_jobseeker(user.id()),
            self.ports.postings.list_open(OPEN_POSTINGS_LIMIT),
            self.ports.posts.list_recent(DEFAULT_FEED_LIMIT),
        );
        let mut degraded = Vec::new();
        let applications = section(applications, "applications", &mut degraded);
        let open_postings = section(open_postings, "openPostings", &mut degraded);
        let posts = section(posts, "posts", &mut degraded);

        Ok(JobseekerDashboard {
            onboarding_required: needs_onboarding(
                Some(&user),
                profile.as_ref(),
                UserRole::Jobseeker,
            ),
            user: Some(user),
            profile,
            applications,
            open_postings,
            posts,
            degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CommunityRepositoryError, FixtureApplicationRepository, FixtureCommunityRepository,
        FixtureCompanyRepository, FixtureDealFlowRepository, FixtureIdeaValidationRepository,
        FixtureJobPostingRepository, FixtureProfileRepository, FixtureUserRepository,
        MockCommunityRepository,
    };
    use crate::domain::{Company, CompanyDraft, FounderProfileDraft, FundingStage, UserRole};

    fn founder() -> User {
        User::try_from_strings(
            Uuid::new_v4(),
            "civic-founder",
            "ada@example.com",
            "Ada Lovelace",
            vec![UserRole::Founder],
        )
        .expect("valid user")
    }

    fn company_for(founder_id: Uuid) -> Company {
        Company::new(CompanyDraft {
            id: Uuid::new_v4(),
            founder_id,
            name: "Loomworks".to_owned(),
            industry: "DevTools".to_owned(),
            stage: FundingStage::Seed,
            valuation: 4_000_000,
        })
        .expect("valid company")
    }

    fn fixture_ports() -> DashboardPorts {
        DashboardPorts {
            users: Arc::new(FixtureUserRepository::default()),
            profiles: Arc::new(FixtureProfileRepository::default()),
            companies: Arc::new(FixtureCompanyRepository::default()),
            validations: Arc::new(FixtureIdeaValidationRepository::default()),
            posts: Arc::new(FixtureCommunityRepository::default()),
            deals: Arc::new(FixtureDealFlowRepository::default()),
            postings: Arc::new(FixtureJobPostingRepository::default()),
            applications: Arc::new(FixtureApplicationRepository::default()),
        }
    }

    #[tokio::test]
    async fn unknown_users_get_an_onboarding_prompt_not_an_error() {
        let service = DashboardService::new(fixture_ports());
        let civic_id = CivicId::new("civic-ghost").expect("valid civic id");

        let dashboard = service
            .founder_dashboard(&civic_id)
            .await
            .expect("dashboard assembles");
        assert!(dashboard.onboarding_required);
        assert!(dashboard.user.is_none());
        assert!(dashboard.companies.is_empty());
        assert!(dashboard.degraded.is_empty());
    }

    #[tokio::test]
    async fn registered_users_without_a_profile_still_need_onboarding() {
        let user = founder();
        let users = FixtureUserRepository::default();
        users.seed(user.clone());
        let mut ports = fixture_ports();
        ports.users = Arc::new(users);
        let service = DashboardService::new(ports);

        let dashboard = service
            .founder_dashboard(user.civic_id())
            .await
            .expect("dashboard assembles");
        assert!(dashboard.onboarding_required);
        assert_eq!(dashboard.user, Some(user));
        assert!(dashboard.profile.is_none());
    }

    #[tokio::test]
    async fn onboarded_founders_see_their_companies() {
        let user = founder();
        let users = FixtureUserRepository::default();
        users.seed(user.clone());
        let profiles = FixtureProfileRepository::default();
        let profile = FounderProfile::new(FounderProfileDraft {
            user_id: user.id(),
            company_count: 1,
            cofounders: vec![],
            bio: None,
            achievements: vec![],
        })
        .expect("valid profile");
        profiles
            .upsert_founder(&profile)
            .await
            .expect("profile stored");
        let companies = FixtureCompanyRepository::default();
        let company = company_for(user.id());
        companies.seed(company.clone());

        let mut ports = fixture_ports();
        ports.users = Arc::new(users);
        ports.profiles = Arc::new(profiles);
        ports.companies = Arc::new(companies);
        let service = DashboardService::new(ports);

        let dashboard = service
            .founder_dashboard(user.civic_id())
            .await
            .expect("dashboard assembles");
        assert!(!dashboard.onboarding_required);
        assert_eq!(dashboard.profile, Some(profile));
        assert_eq!(dashboard.companies, vec![company]);
    }

    #[tokio::test]
    async fn a_failing_section_degrades_instead_of_erroring() {
        let user = founder();
        let users = FixtureUserRepository::default();
        users.seed(user.clone());
        let mut failing_posts = MockCommunityRepository::new();
        failing_posts.expect_list_recent().returning(|_| {
            Err(CommunityRepositoryError::Connection {
                message: "feed store down".to_owned(),
            })
        });

        let mut ports = fixture_ports();
        ports.users = Arc::new(users);
        ports.posts = Arc::new(failing_posts);
        let service = DashboardService::new(ports);

        let dashboard = service
            .founder_dashboard(user.civic_id())
            .await
            .expect("dashboard assembles");
        assert_eq!(dashboard.degraded, vec!["posts".to_owned()]);
        assert!(dashboard.posts.is_empty());
    }

    #[tokio::test]
    async fn jobseeker_dashboard_lists_open_postings() {
        let user = User::try_from_strings(
            Uuid::new_v4(),
            "civic-seeker",
            "grace@example.com",
            "Grace Hopper",
            vec![UserRole::Jobseeker],
        )
        .expect("valid user");
        let users = FixtureUserRepository::default();
        users.seed(user.clone());

        let mut ports = fixture_ports();
        ports.users = Arc::new(users);
        let service = DashboardService::new(ports);

        let dashboard = service
            .jobseeker_dashboard(user.civic_id())
            .await
            .expect("dashboard assembles");
        assert!(dashboard.onboarding_required);
        assert!(dashboard.open_postings.is_empty());
        assert!(dashboard.degraded.is_empty());
    }
}

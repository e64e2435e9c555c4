//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers every HTTP endpoint from the
//! inbound layer together with the domain schemas they exchange.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{
    Application, ApplicationStatus, ChainSyncState, CommunityPost, Company, DealFlow, DealStatus,
    Error, ErrorCode, ExperienceLevel, FounderDashboard, FounderProfile, FundDealResponse,
    FundingStage, IdeaValidation, InvestorDashboard, InvestorProfile, JobPosting,
    JobseekerDashboard, JobseekerProfile, OnboardingForm, OnboardingOutcome, OnboardingProfile,
    OnboardingStepValidation, PostingStatus, User, UserRole,
};
use crate::inbound::http::applications::{SubmitApplicationBody, UpdateStatusBody};
use crate::inbound::http::community::{CreatePostBody, ToggleLikeBody};
use crate::inbound::http::companies::CreateCompanyBody;
use crate::inbound::http::deals::FundDealBody;
use crate::inbound::http::jobs::CreatePostingBody;
use crate::inbound::http::onboarding::{SubmitOnboardingBody, ValidateStepBody};
use crate::inbound::http::profiles::{
    FounderProfileBody, InvestorProfileBody, JobseekerProfileBody,
};
use crate::inbound::http::users::{RegisterUserBody, UpdateRolesBody};
use crate::inbound::http::validations::SubmitIdeaBody;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Launchpad backend API",
        description = "HTTP interface for the startup ecosystem platform: \
            accounts, persona profiles, companies, jobs, idea validations, \
            community feed, and investor deal flow.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::lookup_user,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::update_roles,
        crate::inbound::http::profiles::get_founder_profile,
        crate::inbound::http::profiles::upsert_founder_profile,
        crate::inbound::http::profiles::get_investor_profile,
        crate::inbound::http::profiles::upsert_investor_profile,
        crate::inbound::http::profiles::get_jobseeker_profile,
        crate::inbound::http::profiles::upsert_jobseeker_profile,
        crate::inbound::http::companies::list_companies,
        crate::inbound::http::companies::create_company,
        crate::inbound::http::jobs::list_postings,
        crate::inbound::http::jobs::create_posting,
        crate::inbound::http::applications::list_company_applications,
        crate::inbound::http::applications::admit_application,
        crate::inbound::http::applications::update_application_status,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::list_jobseeker_applications,
        crate::inbound::http::validations::list_validations,
        crate::inbound::http::validations::submit_validation,
        crate::inbound::http::deals::list_deals,
        crate::inbound::http::deals::fund_deal,
        crate::inbound::http::community::list_posts,
        crate::inbound::http::community::create_post,
        crate::inbound::http::community::toggle_like,
        crate::inbound::http::dashboards::founder_dashboard,
        crate::inbound::http::dashboards::investor_dashboard,
        crate::inbound::http::dashboards::jobseeker_dashboard,
        crate::inbound::http::onboarding::validate_step,
        crate::inbound::http::onboarding::submit_onboarding,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        User,
        UserRole,
        Company,
        FundingStage,
        JobPosting,
        PostingStatus,
        Application,
        ApplicationStatus,
        IdeaValidation,
        DealFlow,
        DealStatus,
        ChainSyncState,
        FundDealResponse,
        CommunityPost,
        FounderProfile,
        InvestorProfile,
        JobseekerProfile,
        ExperienceLevel,
        FounderDashboard,
        InvestorDashboard,
        JobseekerDashboard,
        OnboardingForm,
        OnboardingOutcome,
        OnboardingProfile,
        OnboardingStepValidation,
        Error,
        ErrorCode,
        RegisterUserBody,
        UpdateRolesBody,
        FounderProfileBody,
        InvestorProfileBody,
        JobseekerProfileBody,
        CreateCompanyBody,
        CreatePostingBody,
        SubmitApplicationBody,
        UpdateStatusBody,
        SubmitIdeaBody,
        FundDealBody,
        CreatePostBody,
        ToggleLikeBody,
        ValidateStepBody,
        SubmitOnboardingBody,
    )),
    tags(
        (name = "users", description = "Account registration and role management"),
        (name = "profiles", description = "Persona profiles keyed by civic id"),
        (name = "companies", description = "Company registry"),
        (name = "jobs", description = "Job postings and applications"),
        (name = "validations", description = "Idea validation scoring"),
        (name = "deals", description = "Investor deal flow and chain sync"),
        (name = "community", description = "Community posts and likes"),
        (name = "dashboards", description = "Per-persona aggregate views"),
        (name = "onboarding", description = "Stepped persona onboarding"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

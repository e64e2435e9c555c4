//! Test helpers for inbound HTTP components.
//!
//! Builds an [`HttpState`] over the fixture repositories so handler tests
//! exercise the real services end to end without a database.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureApplicationRepository, FixtureCommunityRepository, FixtureCompanyRepository,
    FixtureDealFlowRepository, FixtureIdeaValidationRepository, FixtureIdempotencyRepository,
    FixtureJobPostingRepository, FixtureProfileRepository, FixtureUserRepository,
};
use crate::domain::{
    AccountService, CommunityService, DashboardPorts, DashboardService, FundingService,
    IdeaValidationService, JobBoardService, OnboardingService, ProfileService, User, UserRole,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Handles onto the fixture repositories backing a test [`HttpState`].
///
/// Tests seed these directly instead of walking through the API for setup.
pub(crate) struct FixtureBackend {
    pub users: Arc<FixtureUserRepository>,
    pub companies: Arc<FixtureCompanyRepository>,
    pub postings: Arc<FixtureJobPostingRepository>,
    pub applications: Arc<FixtureApplicationRepository>,
    pub validations: Arc<FixtureIdeaValidationRepository>,
    pub posts: Arc<FixtureCommunityRepository>,
    pub deals: Arc<FixtureDealFlowRepository>,
}

/// Build an [`HttpState`] wired to fresh fixture repositories.
pub(crate) fn fixture_state() -> (HttpState, FixtureBackend) {
    let users = Arc::new(FixtureUserRepository::default());
    let profiles = Arc::new(FixtureProfileRepository::default());
    let companies = Arc::new(FixtureCompanyRepository::default());
    let postings = Arc::new(FixtureJobPostingRepository::default());
    let applications = Arc::new(FixtureApplicationRepository::default());
    let validations = Arc::new(FixtureIdeaValidationRepository::default());
    let posts = Arc::new(FixtureCommunityRepository::default());
    let deals = Arc::new(FixtureDealFlowRepository::default());
    let idempotency = Arc::new(FixtureIdempotencyRepository::default());

    let accounts = Arc::new(AccountService::new(users.clone()));
    let profile_service = Arc::new(ProfileService::new(users.clone(), profiles.clone()));
    let job_board = Arc::new(JobBoardService::new(
        users.clone(),
        companies.clone(),
        postings.clone(),
        applications.clone(),
    ));
    let validation_service = Arc::new(IdeaValidationService::new(
        users.clone(),
        companies.clone(),
        validations.clone(),
    ));
    let funding = Arc::new(FundingService::new(
        users.clone(),
        companies.clone(),
        deals.clone(),
        idempotency,
        true,
    ));
    let community = Arc::new(CommunityService::new(users.clone(), posts.clone()));
    let dashboards = Arc::new(DashboardService::new(DashboardPorts {
        users: users.clone(),
        profiles: profiles.clone(),
        companies: companies.clone(),
        validations: validations.clone(),
        posts: posts.clone(),
        deals: deals.clone(),
        postings: postings.clone(),
        applications: applications.clone(),
    }));
    let onboarding = Arc::new(OnboardingService::new(users.clone(), profiles));

    let state = HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        profiles: profile_service.clone(),
        profiles_query: profile_service,
        job_board: job_board.clone(),
        job_board_query: job_board,
        validations: validation_service,
        funding,
        community,
        dashboards,
        onboarding,
    });

    let backend = FixtureBackend {
        users,
        companies,
        postings,
        applications,
        validations,
        posts,
        deals,
    };
    (state, backend)
}

/// Build an actix test app serving the full `/api` surface over `state`.
pub(crate) fn test_app(
    state: HttpState,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(actix_web::web::Data::new(state))
        .configure(crate::inbound::http::configure_api)
}

/// Seed and return a registered user with the given civic id and roles.
pub(crate) fn seed_user(backend: &FixtureBackend, civic_id: &str, roles: &[UserRole]) -> User {
    let user = User::try_from_strings(
        uuid::Uuid::new_v4(),
        civic_id,
        format!("{civic_id}@example.com"),
        "Ada Lovelace",
        roles.to_vec(),
    )
    .expect("valid fixture user");
    backend.users.seed(user.clone());
    user
}

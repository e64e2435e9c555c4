//! Fixture-backed wiring shared by the integration suites.
//!
//! Mirrors the production assembly: every service is built over in-memory
//! repositories, so journeys exercise the full HTTP-to-domain path without
//! a database.
#![allow(dead_code)]

use std::sync::Arc;

use backend::domain::ports::{
    FixtureApplicationRepository, FixtureCommunityRepository, FixtureCompanyRepository,
    FixtureDealFlowRepository, FixtureIdeaValidationRepository, FixtureIdempotencyRepository,
    FixtureJobPostingRepository, FixtureProfileRepository, FixtureUserRepository,
};
use backend::domain::{
    AccountService, CommunityService, DashboardPorts, DashboardService, FundingService,
    IdeaValidationService, JobBoardService, OnboardingService, ProfileService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};

/// Repository handles a suite can reach past the HTTP surface, for the
/// pieces that run outside it (the chain sync worker).
pub struct FixtureBackend {
    pub companies: Arc<FixtureCompanyRepository>,
    pub deals: Arc<FixtureDealFlowRepository>,
}

/// Build an [`HttpState`] wired to fresh fixture repositories.
pub fn fixture_state() -> (HttpState, FixtureBackend) {
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
    let onboarding = Arc::new(OnboardingService::new(users, profiles));

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

    let backend = FixtureBackend { companies, deals };
    (state, backend)
}

/// Build an actix test app serving the full `/api` surface over `state`.
pub fn test_app(
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
        .configure(backend::inbound::http::configure_api)
}

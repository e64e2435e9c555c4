//! Builders selecting database-backed or fixture-backed service wiring.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    ApplicationRepository, CommunityRepository, CompanyRepository, DealFlowRepository,
    FixtureApplicationRepository, FixtureCommunityRepository, FixtureCompanyRepository,
    FixtureDealFlowRepository, FixtureIdeaValidationRepository, FixtureIdempotencyRepository,
    FixtureJobPostingRepository, FixtureProfileRepository, FixtureUserRepository,
    IdeaValidationRepository, IdempotencyRepository, JobPostingRepository, ProfileRepository,
    UserRepository,
};
use backend::domain::{
    AccountService, CommunityService, DashboardPorts, DashboardService, FundingService,
    IdeaValidationService, JobBoardService, OnboardingService, ProfileService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselCommunityRepository, DieselCompanyRepository,
    DieselDealFlowRepository, DieselIdeaValidationRepository, DieselIdempotencyRepository,
    DieselJobPostingRepository, DieselProfileRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository bundle the services are wired over.
///
/// Generic over concrete adapter types so one wiring path serves both the
/// Diesel-backed and fixture-backed configurations.
struct RepositorySet<U, P, C, J, A, V, D, K, I> {
    users: Arc<U>,
    profiles: Arc<P>,
    companies: Arc<C>,
    postings: Arc<J>,
    applications: Arc<A>,
    validations: Arc<V>,
    deals: Arc<D>,
    posts: Arc<K>,
    idempotency: Arc<I>,
}

/// Handles the binary keeps after wiring: the HTTP state plus the
/// repository trait objects shared with the sync worker and seeding.
pub(crate) struct BackendHandles {
    pub http_state: web::Data<HttpState>,
    pub companies: Arc<dyn CompanyRepository>,
    pub deals: Arc<dyn DealFlowRepository>,
    #[cfg(feature = "demo-data")]
    pub users: Arc<dyn UserRepository>,
    #[cfg(feature = "demo-data")]
    pub profiles: Arc<dyn ProfileRepository>,
    #[cfg(feature = "demo-data")]
    pub postings: Arc<dyn JobPostingRepository>,
    #[cfg(feature = "demo-data")]
    pub posts: Arc<dyn CommunityRepository>,
}

/// Build the HTTP state and shared handles from the server configuration.
///
/// A configured pool selects the Diesel repositories; without one the
/// fixture adapters serve in-memory state so the server still boots for
/// local development and integration tests.
pub(crate) fn build_backend(config: &ServerConfig) -> BackendHandles {
    match &config.db_pool {
        Some(pool) => wire_backend(diesel_repositories(pool), config.chain_sync_enabled),
        None => wire_backend(fixture_repositories(), config.chain_sync_enabled),
    }
}

fn diesel_repositories(
    pool: &DbPool,
) -> RepositorySet<
    DieselUserRepository,
    DieselProfileRepository,
    DieselCompanyRepository,
    DieselJobPostingRepository,
    DieselApplicationRepository,
    DieselIdeaValidationRepository,
    DieselDealFlowRepository,
    DieselCommunityRepository,
    DieselIdempotencyRepository,
> {
    RepositorySet {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
        companies: Arc::new(DieselCompanyRepository::new(pool.clone())),
        postings: Arc::new(DieselJobPostingRepository::new(pool.clone())),
        applications: Arc::new(DieselApplicationRepository::new(pool.clone())),
        validations: Arc::new(DieselIdeaValidationRepository::new(pool.clone())),
        deals: Arc::new(DieselDealFlowRepository::new(pool.clone())),
        posts: Arc::new(DieselCommunityRepository::new(pool.clone())),
        idempotency: Arc::new(DieselIdempotencyRepository::new(pool.clone())),
    }
}

fn fixture_repositories() -> RepositorySet<
    FixtureUserRepository,
    FixtureProfileRepository,
    FixtureCompanyRepository,
    FixtureJobPostingRepository,
    FixtureApplicationRepository,
    FixtureIdeaValidationRepository,
    FixtureDealFlowRepository,
    FixtureCommunityRepository,
    FixtureIdempotencyRepository,
> {
    RepositorySet {
        users: Arc::new(FixtureUserRepository::default()),
        profiles: Arc::new(FixtureProfileRepository::default()),
        companies: Arc::new(FixtureCompanyRepository::default()),
        postings: Arc::new(FixtureJobPostingRepository::default()),
        applications: Arc::new(FixtureApplicationRepository::default()),
        validations: Arc::new(FixtureIdeaValidationRepository::default()),
        deals: Arc::new(FixtureDealFlowRepository::default()),
        posts: Arc::new(FixtureCommunityRepository::default()),
        idempotency: Arc::new(FixtureIdempotencyRepository::default()),
    }
}

fn wire_backend<U, P, C, J, A, V, D, K, I>(
    repos: RepositorySet<U, P, C, J, A, V, D, K, I>,
    chain_sync_enabled: bool,
) -> BackendHandles
where
    U: UserRepository + 'static,
    P: ProfileRepository + 'static,
    C: CompanyRepository + 'static,
    J: JobPostingRepository + 'static,
    A: ApplicationRepository + 'static,
    V: IdeaValidationRepository + 'static,
    D: DealFlowRepository + 'static,
    K: CommunityRepository + 'static,
    I: IdempotencyRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(repos.users.clone()));
    let profile_service = Arc::new(ProfileService::new(
        repos.users.clone(),
        repos.profiles.clone(),
    ));
    let job_board = Arc::new(JobBoardService::new(
        repos.users.clone(),
        repos.companies.clone(),
        repos.postings.clone(),
        repos.applications.clone(),
    ));
    let validation_service = Arc::new(IdeaValidationService::new(
        repos.users.clone(),
        repos.companies.clone(),
        repos.validations.clone(),
    ));
    let funding = Arc::new(FundingService::new(
        repos.users.clone(),
        repos.companies.clone(),
        repos.deals.clone(),
        repos.idempotency,
        chain_sync_enabled,
    ));
    let community = Arc::new(CommunityService::new(
        repos.users.clone(),
        repos.posts.clone(),
    ));
    let dashboards = Arc::new(DashboardService::new(DashboardPorts {
        users: repos.users.clone(),
        profiles: repos.profiles.clone(),
        companies: repos.companies.clone(),
        validations: repos.validations,
        posts: repos.posts.clone(),
        deals: repos.deals.clone(),
        postings: repos.postings.clone(),
        applications: repos.applications,
    }));
    let onboarding = Arc::new(OnboardingService::new(
        repos.users.clone(),
        repos.profiles.clone(),
    ));

    let http_state = web::Data::new(HttpState::new(HttpStatePorts {
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
    }));

    BackendHandles {
        http_state,
        companies: repos.companies,
        deals: repos.deals,
        #[cfg(feature = "demo-data")]
        users: repos.users,
        #[cfg(feature = "demo-data")]
        profiles: repos.profiles,
        #[cfg(feature = "demo-data")]
        postings: repos.postings,
        #[cfg(feature = "demo-data")]
        posts: repos.posts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use rstest::rstest;

    fn config_without_pool() -> ServerConfig {
        ServerConfig::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_backend_serves_an_empty_store() {
        let handles = build_backend(&config_without_pool());
        let companies = handles
            .companies
            .list_all()
            .await
            .expect("fixture listing succeeds");
        assert!(companies.is_empty());

        let pending = handles
            .deals
            .list_pending_sync(10)
            .await
            .expect("fixture listing succeeds");
        assert!(pending.is_empty());
    }
}

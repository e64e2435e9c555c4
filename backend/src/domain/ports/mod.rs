//! Domain ports and supporting types for the hexagonal boundary.

mod application_repository;
mod chain_gateway;
mod chain_sync_metrics;
mod community_repository;
mod company_repository;
mod deal_flow_repository;
mod idea_validation_repository;
mod idempotency_repository;
mod job_posting_repository;
mod profile_repository;
mod user_repository;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationRepository, ApplicationRepositoryError, FixtureApplicationRepository,
};
#[cfg(test)]
pub use chain_gateway::MockChainGateway;
pub use chain_gateway::{
    ChainCompanySubmission, ChainDealSubmission, ChainGateway, ChainGatewayError,
    FixtureChainGateway,
};
#[cfg(test)]
pub use chain_sync_metrics::MockChainSyncMetrics;
pub use chain_sync_metrics::{
    ChainSyncFailure, ChainSyncFailureKind, ChainSyncMetrics, ChainSyncMetricsError,
    ChainSyncSuccess, NoOpChainSyncMetrics,
};
#[cfg(test)]
pub use community_repository::MockCommunityRepository;
pub use community_repository::{
    CommunityRepository, CommunityRepositoryError, FixtureCommunityRepository,
};
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use company_repository::{CompanyRepository, CompanyRepositoryError, FixtureCompanyRepository};
#[cfg(test)]
pub use deal_flow_repository::MockDealFlowRepository;
pub use deal_flow_repository::{
    DealFlowRepository, DealFlowRepositoryError, FixtureDealFlowRepository,
};
#[cfg(test)]
pub use idea_validation_repository::MockIdeaValidationRepository;
pub use idea_validation_repository::{
    FixtureIdeaValidationRepository, IdeaValidationRepository, IdeaValidationRepositoryError,
};
#[cfg(test)]
pub use idempotency_repository::MockIdempotencyRepository;
pub use idempotency_repository::{
    FixtureIdempotencyRepository, IdempotencyRepository, IdempotencyRepositoryError,
};
#[cfg(test)]
pub use job_posting_repository::MockJobPostingRepository;
pub use job_posting_repository::{
    FixtureJobPostingRepository, JobPostingRepository, JobPostingRepositoryError,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};

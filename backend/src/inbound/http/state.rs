//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{
    AccountCommand, AccountQuery, CommunityFeed, DashboardQuery, DealFunding, IdeaValidationFlow,
    JobBoardCommand, JobBoardQuery, OnboardingFlow, ProfileCommand, ProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub profiles_query: Arc<dyn ProfileQuery>,
    pub job_board: Arc<dyn JobBoardCommand>,
    pub job_board_query: Arc<dyn JobBoardQuery>,
    pub validations: Arc<dyn IdeaValidationFlow>,
    pub funding: Arc<dyn DealFunding>,
    pub community: Arc<dyn CommunityFeed>,
    pub dashboards: Arc<dyn DashboardQuery>,
    pub onboarding: Arc<dyn OnboardingFlow>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub profiles_query: Arc<dyn ProfileQuery>,
    pub job_board: Arc<dyn JobBoardCommand>,
    pub job_board_query: Arc<dyn JobBoardQuery>,
    pub validations: Arc<dyn IdeaValidationFlow>,
    pub funding: Arc<dyn DealFunding>,
    pub community: Arc<dyn CommunityFeed>,
    pub dashboards: Arc<dyn DashboardQuery>,
    pub onboarding: Arc<dyn OnboardingFlow>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            profiles,
            profiles_query,
            job_board,
            job_board_query,
            validations,
            funding,
            community,
            dashboards,
            onboarding,
        } = ports;
        Self {
            accounts,
            accounts_query,
            profiles,
            profiles_query,
            job_board,
            job_board_query,
            validations,
            funding,
            community,
            dashboards,
            onboarding,
        }
    }
}

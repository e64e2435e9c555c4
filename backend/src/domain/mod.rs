//! Domain entities, ports, and services.
//!
//! The domain layer owns the platform's business rules: validated entities,
//! the port traits adapters implement, and the services the HTTP layer drives
//! through trait objects. Nothing in here touches the database or the network
//! directly.

pub mod chain_sync_worker;
pub mod idempotency;
pub mod ports;

pub mod account_service;
pub mod community;
pub mod community_service;
pub mod company;
pub mod dashboard_service;
pub mod deal_flow;
pub mod error;
pub mod funding_service;
pub mod idea_validation;
pub mod job_board_service;
pub mod jobs;
pub mod onboarding_service;
pub mod profile_service;
pub mod profiles;
pub mod trace_id;
pub mod user;
pub mod validation_service;

mod service_support;

pub use self::account_service::{
    AccountCommand, AccountQuery, AccountService, RegisterUserRequest,
};
pub use self::chain_sync_worker::{
    BackoffJitter, ChainSyncPassReport, ChainSyncWorker, ChainSyncWorkerConfig,
    ChainSyncWorkerPorts, ChainSyncWorkerRuntime, SyncSleeper,
};
pub use self::community::{CommunityPost, CommunityValidationError, POST_CONTENT_MAX};
pub use self::community_service::{CommunityFeed, CommunityService, DEFAULT_FEED_LIMIT};
pub use self::company::{
    COMPANY_NAME_MAX, Company, CompanyDraft, CompanyValidationError, FundingStage, INDUSTRY_MAX,
    ParseFundingStageError,
};
pub use self::dashboard_service::{
    DashboardPorts, DashboardQuery, DashboardService, FounderDashboard, InvestorDashboard,
    JobseekerDashboard,
};
pub use self::deal_flow::{
    ChainSyncState, DealFlow, DealFlowDraft, DealStatus, DealValidationError, ParseDealStatusError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::funding_service::{DealFunding, FundDealRequest, FundDealResponse, FundingService};
pub use self::idea_validation::{
    IDEA_TEXT_MAX, IdeaValidation, IdeaValidationDraft, IdeaValidationError, score_band,
    score_idea_text,
};
pub use self::idempotency::{
    IdempotencyKey, IdempotencyKeyValidationError, IdempotencyLookupQuery, IdempotencyLookupResult,
    IdempotencyRecord, MutationType, ParseMutationTypeError, PayloadHash, PayloadHashError,
    canonicalize_and_hash,
};
pub use self::job_board_service::{
    ApplyRequest, CreateCompanyRequest, CreatePostingRequest, JobBoardCommand, JobBoardQuery,
    JobBoardService,
};
pub use self::jobs::{
    Application, ApplicationDraft, ApplicationStatus, COVER_LETTER_MAX, JOB_TITLE_MAX, JobPosting,
    JobPostingDraft, JobValidationError, ParseStatusError, PostingStatus,
};
pub use self::onboarding_service::{
    OnboardingFlow, OnboardingForm, OnboardingOutcome, OnboardingProfile, OnboardingService,
    OnboardingStepValidation, OnboardingSubmission,
};
pub use self::profile_service::{
    FounderProfileData, InvestorProfileData, JobseekerProfileData, ProfileCommand, ProfileQuery,
    ProfileService,
};
pub use self::profiles::{
    ExperienceLevel, FounderProfile, FounderProfileDraft, InvestorProfile, InvestorProfileDraft,
    JobseekerProfile, JobseekerProfileDraft, ParseExperienceLevelError, ProfileValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CIVIC_ID_MAX, CivicId, EMAIL_MAX, EmailAddress, PERSONA_NAME_MAX, PERSONA_NAME_MIN,
    ParseUserRoleError, PersonaName, User, UserRole, UserValidationError,
};
pub use self::validation_service::{IdeaValidationFlow, IdeaValidationService, SubmitIdeaRequest};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

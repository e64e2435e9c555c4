//! Shared helpers for domain services.
//!
//! Services map port errors into the domain [`Error`] taxonomy in one place:
//! connection failures surface as 503, everything else as a redacted 500,
//! except where a port error has a precise client meaning (duplicate civic
//! id, stale status) and maps to a 4xx.

use serde_json::json;

use crate::domain::ports::{
    ApplicationRepositoryError, CommunityRepositoryError, CompanyRepositoryError,
    DealFlowRepositoryError, IdeaValidationRepositoryError, IdempotencyRepositoryError,
    JobPostingRepositoryError, ProfileRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{CivicId, Error, User};

pub(crate) fn map_user_repo_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::DuplicateCivicId { civic_id } => {
            Error::conflict(format!("civic id '{civic_id}' is already registered"))
        }
        UserRepositoryError::Query { message } | UserRepositoryError::Corrupt { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_profile_repo_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } | ProfileRepositoryError::Corrupt { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

pub(crate) fn map_company_repo_error(error: CompanyRepositoryError) -> Error {
    match error {
        CompanyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("company repository unavailable: {message}"))
        }
        CompanyRepositoryError::Query { message } | CompanyRepositoryError::Corrupt { message } => {
            Error::internal(format!("company repository error: {message}"))
        }
    }
}

pub(crate) fn map_posting_repo_error(error: JobPostingRepositoryError) -> Error {
    match error {
        JobPostingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job posting repository unavailable: {message}"))
        }
        JobPostingRepositoryError::Query { message }
        | JobPostingRepositoryError::Corrupt { message } => {
            Error::internal(format!("job posting repository error: {message}"))
        }
    }
}

pub(crate) fn map_application_repo_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::StaleStatus { actual } => {
            Error::conflict("application status changed concurrently").with_details(json!({
                "actualStatus": actual,
                "code": "stale_status",
            }))
        }
        ApplicationRepositoryError::Query { message }
        | ApplicationRepositoryError::Corrupt { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
    }
}

pub(crate) fn map_validation_repo_error(error: IdeaValidationRepositoryError) -> Error {
    match error {
        IdeaValidationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("idea validation repository unavailable: {message}"))
        }
        IdeaValidationRepositoryError::Query { message }
        | IdeaValidationRepositoryError::Corrupt { message } => {
            Error::internal(format!("idea validation repository error: {message}"))
        }
    }
}

pub(crate) fn map_deal_repo_error(error: DealFlowRepositoryError) -> Error {
    match error {
        DealFlowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deal repository unavailable: {message}"))
        }
        DealFlowRepositoryError::Query { message } | DealFlowRepositoryError::Corrupt { message } => {
            Error::internal(format!("deal repository error: {message}"))
        }
    }
}

pub(crate) fn map_community_repo_error(error: CommunityRepositoryError) -> Error {
    match error {
        CommunityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("community repository unavailable: {message}"))
        }
        CommunityRepositoryError::Query { message }
        | CommunityRepositoryError::Corrupt { message } => {
            Error::internal(format!("community repository error: {message}"))
        }
    }
}

pub(crate) fn map_idempotency_error(error: IdempotencyRepositoryError) -> Error {
    match error {
        IdempotencyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("idempotency repository unavailable: {message}"))
        }
        IdempotencyRepositoryError::Query { message }
        | IdempotencyRepositoryError::Serialization { message } => {
            Error::internal(format!("idempotency repository error: {message}"))
        }
        IdempotencyRepositoryError::DuplicateKey { message } => {
            Error::internal(format!("unexpected idempotency key conflict: {message}"))
        }
    }
}

/// Error returned when a civic id resolves to no registered user.
pub(crate) fn unknown_user_error(civic_id: &CivicId) -> Error {
    Error::not_found(format!("user '{civic_id}' not found"))
}

/// Resolve a civic id to its registered user, or a 404-class error.
pub(crate) async fn resolve_user(
    repo: &dyn UserRepository,
    civic_id: &CivicId,
) -> Result<User, Error> {
    repo.find_by_civic_id(civic_id)
        .await
        .map_err(map_user_repo_error)?
        .ok_or_else(|| unknown_user_error(civic_id))
}

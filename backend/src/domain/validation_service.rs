//! Idea validation domain service.
//!
//! Scoring happens entirely server-side through the deterministic heuristic
//! in [`crate::domain::idea_validation`]; the service resolves the caller,
//! checks the optional company link, and persists the assessment.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{CompanyRepository, IdeaValidationRepository, UserRepository};
use crate::domain::service_support::{
    map_company_repo_error, map_validation_repo_error, resolve_user,
};
use crate::domain::{CivicId, Error, IdeaValidation};

/// Request payload for submitting an idea for validation.
#[derive(Debug, Clone)]
pub struct SubmitIdeaRequest {
    /// Civic id of the submitting founder.
    pub civic_id: CivicId,
    /// Optional company the idea belongs to.
    pub company_id: Option<Uuid>,
    /// Free-form idea description.
    pub idea_text: String,
}

/// Driving port for idea validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdeaValidationFlow: Send + Sync {
    /// Score and store an idea submission.
    async fn submit(&self, request: SubmitIdeaRequest) -> Result<IdeaValidation, Error>;

    /// List a user's past submissions in submission order.
    async fn list(&self, civic_id: &CivicId) -> Result<Vec<IdeaValidation>, Error>;
}

/// Idea validation service implementing the driving port.
#[derive(Clone)]
pub struct IdeaValidationService<U, C, V> {
    users: Arc<U>,
    companies: Arc<C>,
    validations: Arc<V>,
}

impl<U, C, V> IdeaValidationService<U, C, V> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, companies: Arc<C>, validations: Arc<V>) -> Self {
        Self {
            users,
            companies,
            validations,
        }
    }
}

#[async_trait]
impl<U, C, V> IdeaValidationFlow for IdeaValidationService<U, C, V>
where
    U: UserRepository,
    C: CompanyRepository,
    V: IdeaValidationRepository,
{
    async fn submit(&self, request: SubmitIdeaRequest) -> Result<IdeaValidation, Error> {
        let user = resolve_user(self.users.as_ref(), &request.civic_id).await?;
        if let Some(company_id) = request.company_id {
            self.companies
                .find_by_id(company_id)
                .await
                .map_err(map_company_repo_error)?
                .ok_or_else(|| Error::not_found(format!("company '{company_id}' not found")))?;
        }

        let assessment = IdeaValidation::assess(
            Uuid::new_v4(),
            user.id(),
            request.company_id,
            request.idea_text,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.validations
            .insert(&assessment)
            .await
            .map_err(map_validation_repo_error)?;
        Ok(assessment)
    }

    async fn list(&self, civic_id: &CivicId) -> Result<Vec<IdeaValidation>, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        self.validations
            .list_by_user(user.id())
            .await
            .map_err(map_validation_repo_error)
    }
}

//! Company and job board domain services.
//!
//! Covers company creation and listing, job postings, and the application
//! lifecycle. Status transitions are checked against the domain's allowed
//! set and then applied with compare-and-set, so an undefined transition and
//! a lost race both surface as 409s rather than silent overwrites.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationRepository, CompanyRepository, JobPostingRepository, UserRepository,
};
use crate::domain::service_support::{
    map_application_repo_error, map_company_repo_error, map_posting_repo_error, resolve_user,
};
use crate::domain::{
    Application, ApplicationDraft, ApplicationStatus, CivicId, Company, CompanyDraft, Error,
    FundingStage, JobPosting, JobPostingDraft, PostingStatus,
};

/// Request payload for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyRequest {
    /// Civic id of the founding user.
    pub civic_id: CivicId,
    /// Registered company name.
    pub name: String,
    /// Industry label.
    pub industry: String,
    /// Current funding stage.
    pub stage: FundingStage,
    /// Valuation in whole currency units.
    pub valuation: i64,
}

/// Request payload for creating a job posting.
#[derive(Debug, Clone)]
pub struct CreatePostingRequest {
    /// Company advertising the role.
    pub company_id: Uuid,
    /// Role title.
    pub title: String,
    /// Skills the role requires.
    pub skills_required: Vec<String>,
}

/// Request payload for submitting an application.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    /// Civic id of the applying jobseeker.
    pub civic_id: CivicId,
    /// Posting applied to.
    pub job_posting_id: Uuid,
    /// Optional cover letter.
    pub cover_letter: Option<String>,
}

/// Driving port for job board mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobBoardCommand: Send + Sync {
    /// Create a company for a founder.
    async fn create_company(&self, request: CreateCompanyRequest) -> Result<Company, Error>;

    /// Create a job posting for a company.
    async fn create_posting(&self, request: CreatePostingRequest) -> Result<JobPosting, Error>;

    /// Submit an application to a posting.
    async fn apply(&self, request: ApplyRequest) -> Result<Application, Error>;

    /// Move an application to a new review status.
    async fn update_application_status(
        &self,
        application_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application, Error>;
}

/// Driving port for job board lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobBoardQuery: Send + Sync {
    /// List companies founded by the user with this civic id.
    async fn list_companies(&self, civic_id: &CivicId) -> Result<Vec<Company>, Error>;

    /// List postings advertised by a company.
    async fn list_postings(&self, company_id: Uuid) -> Result<Vec<JobPosting>, Error>;

    /// List applications against any of a company's postings.
    async fn list_company_applications(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<Application>, Error>;

    /// List applications submitted by the jobseeker with this civic id.
    async fn list_jobseeker_applications(
        &self,
        civic_id: &CivicId,
    ) -> Result<Vec<Application>, Error>;
}

/// Job board service implementing the driving ports.
#[derive(Clone)]
pub struct JobBoardService<U, C, P, A> {
    users: Arc<U>,
    companies: Arc<C>,
    postings: Arc<P>,
    applications: Arc<A>,
}

impl<U, C, P, A> JobBoardService<U, C, P, A> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, companies: Arc<C>, postings: Arc<P>, applications: Arc<A>) -> Self {
        Self {
            users,
            companies,
            postings,
            applications,
        }
    }
}

fn unknown_company_error(company_id: Uuid) -> Error {
    Error::not_found(format!("company '{company_id}' not found"))
}

impl<U, C, P, A> JobBoardService<U, C, P, A>
where
    U: UserRepository,
    C: CompanyRepository,
    P: JobPostingRepository,
    A: ApplicationRepository,
{
    async fn require_company(&self, company_id: Uuid) -> Result<Company, Error> {
        self.companies
            .find_by_id(company_id)
            .await
            .map_err(map_company_repo_error)?
            .ok_or_else(|| unknown_company_error(company_id))
    }
}

#[async_trait]
impl<U, C, P, A> JobBoardCommand for JobBoardService<U, C, P, A>
where
    U: UserRepository,
    C: CompanyRepository,
    P: JobPostingRepository,
    A: ApplicationRepository,
{
    async fn create_company(&self, request: CreateCompanyRequest) -> Result<Company, Error> {
        let founder = resolve_user(self.users.as_ref(), &request.civic_id).await?;
        let company = Company::new(CompanyDraft {
            id: Uuid::new_v4(),
            founder_id: founder.id(),
            name: request.name,
            industry: request.industry,
            stage: request.stage,
            valuation: request.valuation,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.companies
            .insert(&company)
            .await
            .map_err(map_company_repo_error)?;
        Ok(company)
    }

    async fn create_posting(&self, request: CreatePostingRequest) -> Result<JobPosting, Error> {
        let company = self.require_company(request.company_id).await?;
        let posting = JobPosting::new(JobPostingDraft {
            id: Uuid::new_v4(),
            company_id: company.id(),
            title: request.title,
            skills_required: request.skills_required,
            status: PostingStatus::Open,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.postings
            .insert(&posting)
            .await
            .map_err(map_posting_repo_error)?;
        Ok(posting)
    }

    async fn apply(&self, request: ApplyRequest) -> Result<Application, Error> {
        let jobseeker = resolve_user(self.users.as_ref(), &request.civic_id).await?;
        let posting = self
            .postings
            .find_by_id(request.job_posting_id)
            .await
            .map_err(map_posting_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "job posting '{}' not found",
                    request.job_posting_id
                ))
            })?;
        if posting.status() == PostingStatus::Closed {
            return Err(
                Error::conflict("job posting is closed to new applications").with_details(json!({
                    "jobPostingId": posting.id(),
                    "code": "posting_closed",
                })),
            );
        }

        let application = Application::new(ApplicationDraft {
            id: Uuid::new_v4(),
            job_posting_id: posting.id(),
            jobseeker_id: jobseeker.id(),
            status: ApplicationStatus::Applied,
            cover_letter: request.cover_letter,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.applications
            .insert(&application)
            .await
            .map_err(map_application_repo_error)?;
        Ok(application)
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application, Error> {
        let current = self
            .applications
            .find_by_id(application_id)
            .await
            .map_err(map_application_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("application '{application_id}' not found"))
            })?;

        if !current.status().can_transition_to(next) {
            return Err(Error::conflict(format!(
                "application status may not move from '{}' to '{next}'",
                current.status()
            ))
            .with_details(json!({
                "from": current.status(),
                "to": next,
                "allowed": current.status().allowed_transitions(),
                "code": "invalid_transition",
            })));
        }

        self.applications
            .update_status(application_id, current.status(), next)
            .await
            .map_err(map_application_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("application '{application_id}' not found"))
            })
    }
}

#[async_trait]
impl<U, C, P, A> JobBoardQuery for JobBoardService<U, C, P, A>
where
    U: UserRepository,
    C: CompanyRepository,
    P: JobPostingRepository,
    A: ApplicationRepository,
{
    async fn list_companies(&self, civic_id: &CivicId) -> Result<Vec<Company>, Error> {
        let founder = resolve_user(self.users.as_ref(), civic_id).await?;
        self.companies
            .list_by_founder(founder.id())
            .await
            .map_err(map_company_repo_error)
    }

    async fn list_postings(&self, company_id: Uuid) -> Result<Vec<JobPosting>, Error> {
        let company = self.require_company(company_id).await?;
        self.postings
            .list_by_company(company.id())
            .await
            .map_err(map_posting_repo_error)
    }

    async fn list_company_applications(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<Application>, Error> {
        let company = self.require_company(company_id).await?;
        let postings = self
            .postings
            .list_by_company(company.id())
            .await
            .map_err(map_posting_repo_error)?;
        let posting_ids: Vec<Uuid> = postings.iter().map(JobPosting::id).collect();
        self.applications
            .list_by_postings(&posting_ids)
            .await
            .map_err(map_application_repo_error)
    }

    async fn list_jobseeker_applications(
        &self,
        civic_id: &CivicId,
    ) -> Result<Vec<Application>, Error> {
        let jobseeker = resolve_user(self.users.as_ref(), civic_id).await?;
        self.applications
            .list_by_jobseeker(jobseeker.id())
            .await
            .map_err(map_application_repo_error)
    }
}

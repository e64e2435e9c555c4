//! Job application handlers.
//!
//! ```text
//! GET /api/company/applications?companyId=...     founder-side review
//! POST /api/company/applications                   admit an application record
//! PUT /api/company/applications                    status transition
//! POST /api/jobseeker/applications                 jobseeker applies
//! GET /api/jobseeker/applications?civicId=...     jobseeker's own applications
//! ```
//!
//! Both POST endpoints drive the same apply operation; the company-side one
//! exists so founders can record applications received out of band.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Application, ApplicationStatus, ApplyRequest, CivicId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_civic_id, parse_uuid, require_param,
};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");
const COMPANY_ID_FIELD: FieldName = FieldName::new("companyId");
const JOB_POSTING_ID_FIELD: FieldName = FieldName::new("jobPostingId");
const APPLICATION_ID_FIELD: FieldName = FieldName::new("applicationId");
const STATUS_FIELD: FieldName = FieldName::new("status");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyIdQuery {
    company_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicIdQuery {
    civic_id: Option<String>,
}

/// Application submission body, shared by both POST endpoints.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationBody {
    pub civic_id: String,
    pub job_posting_id: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// Status transition body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub application_id: String,
    pub status: String,
}

fn parse_apply_body(body: SubmitApplicationBody) -> Result<ApplyRequest, Error> {
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let job_posting_id = parse_uuid(&body.job_posting_id, JOB_POSTING_ID_FIELD)?;
    Ok(ApplyRequest {
        civic_id,
        job_posting_id,
        cover_letter: body.cover_letter,
    })
}

async fn apply(state: &HttpState, body: SubmitApplicationBody) -> ApiResult<HttpResponse> {
    let request = parse_apply_body(body)?;
    let application = state.job_board.apply(request).await?;
    Ok(HttpResponse::Created().json(application))
}

/// List applications against any of a company's postings.
#[utoipa::path(
    get,
    path = "/api/company/applications",
    params(("companyId" = String, Query, description = "Company identifier")),
    responses(
        (status = 200, description = "Applications", body = [Application]),
        (status = 400, description = "Missing or invalid companyId", body = Error),
        (status = 404, description = "Unknown company", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listCompanyApplications"
)]
#[get("/company/applications")]
pub async fn list_company_applications(
    state: web::Data<HttpState>,
    query: web::Query<CompanyIdQuery>,
) -> ApiResult<web::Json<Vec<Application>>> {
    let raw = require_param(query.into_inner().company_id, COMPANY_ID_FIELD)?;
    let company_id = parse_uuid(&raw, COMPANY_ID_FIELD)?;
    let applications = state
        .job_board_query
        .list_company_applications(company_id)
        .await?;
    Ok(web::Json(applications))
}

/// Record an application on the company side.
#[utoipa::path(
    post,
    path = "/api/company/applications",
    request_body = SubmitApplicationBody,
    responses(
        (status = 201, description = "Application recorded", body = Application),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or posting", body = Error),
        (status = 409, description = "Posting is closed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applications"],
    operation_id = "admitApplication"
)]
#[post("/company/applications")]
pub async fn admit_application(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitApplicationBody>,
) -> ApiResult<HttpResponse> {
    apply(&state, payload.into_inner()).await
}

/// Move an application to a new review status.
#[utoipa::path(
    put,
    path = "/api/company/applications",
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Updated application", body = Application),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown application", body = Error),
        (status = 409, description = "Transition not allowed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applications"],
    operation_id = "updateApplicationStatus"
)]
#[put("/company/applications")]
pub async fn update_application_status(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<web::Json<Application>> {
    let body = payload.into_inner();
    let application_id = parse_uuid(&body.application_id, APPLICATION_ID_FIELD)?;
    let status = ApplicationStatus::from_str(&body.status)
        .map_err(|err| invalid_value_error(STATUS_FIELD, &body.status, err.to_string()))?;
    let application = state
        .job_board
        .update_application_status(application_id, status)
        .await?;
    Ok(web::Json(application))
}

/// Submit an application as a jobseeker.
#[utoipa::path(
    post,
    path = "/api/jobseeker/applications",
    request_body = SubmitApplicationBody,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or posting", body = Error),
        (status = 409, description = "Posting is closed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/jobseeker/applications")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitApplicationBody>,
) -> ApiResult<HttpResponse> {
    apply(&state, payload.into_inner()).await
}

/// List a jobseeker's own applications.
#[utoipa::path(
    get,
    path = "/api/jobseeker/applications",
    params(("civicId" = String, Query, description = "Jobseeker's civic id")),
    responses(
        (status = 200, description = "Applications", body = [Application]),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listJobseekerApplications"
)]
#[get("/jobseeker/applications")]
pub async fn list_jobseeker_applications(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<Vec<Application>>> {
    let raw = require_param(query.into_inner().civic_id, CIVIC_ID_FIELD)?;
    let civic_id: CivicId = parse_civic_id(&raw, CIVIC_ID_FIELD)?;
    let applications = state
        .job_board_query
        .list_jobseeker_applications(&civic_id)
        .await?;
    Ok(web::Json(applications))
}

//! Job posting handlers.
//!
//! ```text
//! GET /api/company/jobs?companyId=...
//! POST /api/company/jobs {"companyId":"...","title":"...","skillsRequired":["rust"]}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CreatePostingRequest, Error, JobPosting};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require_param};

const COMPANY_ID_FIELD: FieldName = FieldName::new("companyId");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyIdQuery {
    company_id: Option<String>,
}

/// Posting creation body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostingBody {
    pub company_id: String,
    pub title: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
}

fn resolve_query_company_id(query: CompanyIdQuery) -> Result<uuid::Uuid, Error> {
    let raw = require_param(query.company_id, COMPANY_ID_FIELD)?;
    parse_uuid(&raw, COMPANY_ID_FIELD)
}

/// List the postings advertised by a company.
#[utoipa::path(
    get,
    path = "/api/company/jobs",
    params(("companyId" = String, Query, description = "Company identifier")),
    responses(
        (status = 200, description = "Postings", body = [JobPosting]),
        (status = 400, description = "Missing or invalid companyId", body = Error),
        (status = 404, description = "Unknown company", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listJobPostings"
)]
#[get("/company/jobs")]
pub async fn list_postings(
    state: web::Data<HttpState>,
    query: web::Query<CompanyIdQuery>,
) -> ApiResult<web::Json<Vec<JobPosting>>> {
    let company_id = resolve_query_company_id(query.into_inner())?;
    let postings = state.job_board_query.list_postings(company_id).await?;
    Ok(web::Json(postings))
}

/// Create a job posting for a company.
#[utoipa::path(
    post,
    path = "/api/company/jobs",
    request_body = CreatePostingBody,
    responses(
        (status = 201, description = "Posting created", body = JobPosting),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown company", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "createJobPosting"
)]
#[post("/company/jobs")]
pub async fn create_posting(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePostingBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let company_id = parse_uuid(&body.company_id, COMPANY_ID_FIELD)?;

    let posting = state
        .job_board
        .create_posting(CreatePostingRequest {
            company_id,
            title: body.title,
            skills_required: body.skills_required,
        })
        .await?;
    Ok(HttpResponse::Created().json(posting))
}

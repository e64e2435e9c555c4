//! Persona dashboard handlers.
//!
//! ```text
//! GET /api/founder/dashboard?civicId=...
//! GET /api/investor/dashboard?civicId=...
//! GET /api/jobseeker/dashboard?civicId=...
//! ```
//!
//! One aggregate endpoint per persona. Secondary sections degrade to empty
//! collections on failure and are named in `degraded` instead of failing the
//! whole response.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{
    CivicId, Error, FounderDashboard, InvestorDashboard, JobseekerDashboard,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_civic_id, require_param};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicIdQuery {
    civic_id: Option<String>,
}

fn resolve_query_civic_id(query: CivicIdQuery) -> Result<CivicId, Error> {
    let raw = require_param(query.civic_id, CIVIC_ID_FIELD)?;
    parse_civic_id(&raw, CIVIC_ID_FIELD)
}

/// Assemble the founder dashboard.
#[utoipa::path(
    get,
    path = "/api/founder/dashboard",
    params(("civicId" = String, Query, description = "Founder's civic id")),
    responses(
        (status = 200, description = "Founder dashboard", body = FounderDashboard),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboards"],
    operation_id = "founderDashboard"
)]
#[get("/founder/dashboard")]
pub async fn founder_dashboard(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<FounderDashboard>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let dashboard = state.dashboards.founder_dashboard(&civic_id).await?;
    Ok(web::Json(dashboard))
}

/// Assemble the investor dashboard.
#[utoipa::path(
    get,
    path = "/api/investor/dashboard",
    params(("civicId" = String, Query, description = "Investor's civic id")),
    responses(
        (status = 200, description = "Investor dashboard", body = InvestorDashboard),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboards"],
    operation_id = "investorDashboard"
)]
#[get("/investor/dashboard")]
pub async fn investor_dashboard(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<InvestorDashboard>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let dashboard = state.dashboards.investor_dashboard(&civic_id).await?;
    Ok(web::Json(dashboard))
}

/// Assemble the jobseeker dashboard.
#[utoipa::path(
    get,
    path = "/api/jobseeker/dashboard",
    params(("civicId" = String, Query, description = "Jobseeker's civic id")),
    responses(
        (status = 200, description = "Jobseeker dashboard", body = JobseekerDashboard),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboards"],
    operation_id = "jobseekerDashboard"
)]
#[get("/jobseeker/dashboard")]
pub async fn jobseeker_dashboard(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<JobseekerDashboard>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let dashboard = state.dashboards.jobseeker_dashboard(&civic_id).await?;
    Ok(web::Json(dashboard))
}

//! Persona profile handlers.
//!
//! ```text
//! GET /api/founder/profile?civicId=...    POST /api/founder/profile
//! GET /api/investor/profile?civicId=...   POST /api/investor/profile
//! GET /api/jobseeker/profile?civicId=...  POST /api/jobseeker/profile
//! ```
//!
//! POSTs upsert: creating a profile and replacing it use the same endpoint,
//! mirroring the onboarding-then-edit flow on the client.

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CivicId, Error, ExperienceLevel, FounderProfile, FounderProfileData, FundingStage,
    InvestorProfile, InvestorProfileData, JobseekerProfile, JobseekerProfileData,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_civic_id, require_param,
};

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

/// Founder profile upsert body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FounderProfileBody {
    pub civic_id: String,
    pub company_count: i32,
    #[serde(default)]
    pub cofounders: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Investor profile upsert body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfileBody {
    pub civic_id: String,
    pub firm_name: String,
    pub check_size_min: i64,
    pub check_size_max: i64,
    #[serde(default)]
    pub preferred_stages: Vec<String>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
}

/// Jobseeker profile upsert body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobseekerProfileBody {
    pub civic_id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience_level: String,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

fn parse_stages(raw: &[String]) -> Result<Vec<FundingStage>, Error> {
    raw.iter()
        .map(|value| {
            FundingStage::from_str(value).map_err(|err| {
                invalid_value_error(FieldName::new("preferredStages"), value, err.to_string())
            })
        })
        .collect()
}

/// Fetch the founder profile for a civic id.
#[utoipa::path(
    get,
    path = "/api/founder/profile",
    params(("civicId" = String, Query, description = "External identity-provider id")),
    responses(
        (status = 200, description = "Founder profile", body = FounderProfile),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user or no profile yet", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getFounderProfile"
)]
#[get("/founder/profile")]
pub async fn get_founder_profile(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<FounderProfile>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let profile = state.profiles_query.fetch_founder(&civic_id).await?;
    Ok(web::Json(profile))
}

/// Create or replace the founder profile for a civic id.
#[utoipa::path(
    post,
    path = "/api/founder/profile",
    request_body = FounderProfileBody,
    responses(
        (status = 200, description = "Stored profile", body = FounderProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "upsertFounderProfile"
)]
#[post("/founder/profile")]
pub async fn upsert_founder_profile(
    state: web::Data<HttpState>,
    payload: web::Json<FounderProfileBody>,
) -> ApiResult<web::Json<FounderProfile>> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let profile = state
        .profiles
        .upsert_founder(
            &civic_id,
            FounderProfileData {
                company_count: body.company_count,
                cofounders: body.cofounders,
                bio: body.bio,
                achievements: body.achievements,
            },
        )
        .await?;
    Ok(web::Json(profile))
}

/// Fetch the investor profile for a civic id.
#[utoipa::path(
    get,
    path = "/api/investor/profile",
    params(("civicId" = String, Query, description = "External identity-provider id")),
    responses(
        (status = 200, description = "Investor profile", body = InvestorProfile),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user or no profile yet", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getInvestorProfile"
)]
#[get("/investor/profile")]
pub async fn get_investor_profile(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<InvestorProfile>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let profile = state.profiles_query.fetch_investor(&civic_id).await?;
    Ok(web::Json(profile))
}

/// Create or replace the investor profile for a civic id.
#[utoipa::path(
    post,
    path = "/api/investor/profile",
    request_body = InvestorProfileBody,
    responses(
        (status = 200, description = "Stored profile", body = InvestorProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "upsertInvestorProfile"
)]
#[post("/investor/profile")]
pub async fn upsert_investor_profile(
    state: web::Data<HttpState>,
    payload: web::Json<InvestorProfileBody>,
) -> ApiResult<web::Json<InvestorProfile>> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let preferred_stages = parse_stages(&body.preferred_stages)?;
    let profile = state
        .profiles
        .upsert_investor(
            &civic_id,
            InvestorProfileData {
                firm_name: body.firm_name,
                check_size_min: body.check_size_min,
                check_size_max: body.check_size_max,
                preferred_stages,
                preferred_industries: body.preferred_industries,
            },
        )
        .await?;
    Ok(web::Json(profile))
}

/// Fetch the jobseeker profile for a civic id.
#[utoipa::path(
    get,
    path = "/api/jobseeker/profile",
    params(("civicId" = String, Query, description = "External identity-provider id")),
    responses(
        (status = 200, description = "Jobseeker profile", body = JobseekerProfile),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user or no profile yet", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getJobseekerProfile"
)]
#[get("/jobseeker/profile")]
pub async fn get_jobseeker_profile(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<JobseekerProfile>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let profile = state.profiles_query.fetch_jobseeker(&civic_id).await?;
    Ok(web::Json(profile))
}

/// Create or replace the jobseeker profile for a civic id.
#[utoipa::path(
    post,
    path = "/api/jobseeker/profile",
    request_body = JobseekerProfileBody,
    responses(
        (status = 200, description = "Stored profile", body = JobseekerProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "upsertJobseekerProfile"
)]
#[post("/jobseeker/profile")]
pub async fn upsert_jobseeker_profile(
    state: web::Data<HttpState>,
    payload: web::Json<JobseekerProfileBody>,
) -> ApiResult<web::Json<JobseekerProfile>> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let experience_level = ExperienceLevel::from_str(&body.experience_level).map_err(|err| {
        invalid_value_error(
            FieldName::new("experienceLevel"),
            &body.experience_level,
            err.to_string(),
        )
    })?;
    let profile = state
        .profiles
        .upsert_jobseeker(
            &civic_id,
            JobseekerProfileData {
                skills: body.skills,
                experience_level,
                resume_url: body.resume_url,
                portfolio_url: body.portfolio_url,
            },
        )
        .await?;
    Ok(web::Json(profile))
}

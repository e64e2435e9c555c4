//! Company handlers.
//!
//! ```text
//! GET /api/company?civicId=...
//! POST /api/company {"civicId":"...","name":"...","industry":"...","stage":"seed","valuation":1000000}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CivicId, Company, CreateCompanyRequest, Error, FundingStage};
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

/// Company creation body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyBody {
    pub civic_id: String,
    pub name: String,
    pub industry: String,
    pub stage: String,
    pub valuation: i64,
}

fn resolve_query_civic_id(query: CivicIdQuery) -> Result<CivicId, Error> {
    let raw = require_param(query.civic_id, CIVIC_ID_FIELD)?;
    parse_civic_id(&raw, CIVIC_ID_FIELD)
}

/// List the companies founded by a user.
#[utoipa::path(
    get,
    path = "/api/company",
    params(("civicId" = String, Query, description = "Founder's civic id")),
    responses(
        (status = 200, description = "Companies", body = [Company]),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["companies"],
    operation_id = "listCompanies"
)]
#[get("/company")]
pub async fn list_companies(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<Vec<Company>>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let companies = state.job_board_query.list_companies(&civic_id).await?;
    Ok(web::Json(companies))
}

/// Create a company for a founder.
#[utoipa::path(
    post,
    path = "/api/company",
    request_body = CreateCompanyBody,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/company")]
pub async fn create_company(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCompanyBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let stage = FundingStage::from_str(&body.stage)
        .map_err(|err| invalid_value_error(FieldName::new("stage"), &body.stage, err.to_string()))?;

    let company = state
        .job_board
        .create_company(CreateCompanyRequest {
            civic_id,
            name: body.name,
            industry: body.industry,
            stage,
            valuation: body.valuation,
        })
        .await?;
    Ok(HttpResponse::Created().json(company))
}

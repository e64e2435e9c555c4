//! Idea validation handlers.
//!
//! ```text
//! GET /api/founder/validations?civicId=...
//! POST /api/founder/validations {"civicId":"...","ideaText":"...","companyId":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, IdeaValidation, SubmitIdeaRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_civic_id, parse_uuid, require_param};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");
const COMPANY_ID_FIELD: FieldName = FieldName::new("companyId");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicIdQuery {
    civic_id: Option<String>,
}

/// Idea submission body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIdeaBody {
    pub civic_id: String,
    pub idea_text: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

/// List a founder's past idea submissions.
#[utoipa::path(
    get,
    path = "/api/founder/validations",
    params(("civicId" = String, Query, description = "Founder's civic id")),
    responses(
        (status = 200, description = "Validations", body = [IdeaValidation]),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["validations"],
    operation_id = "listIdeaValidations"
)]
#[get("/founder/validations")]
pub async fn list_validations(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<Vec<IdeaValidation>>> {
    let raw = require_param(query.into_inner().civic_id, CIVIC_ID_FIELD)?;
    let civic_id = parse_civic_id(&raw, CIVIC_ID_FIELD)?;
    let validations = state.validations.list(&civic_id).await?;
    Ok(web::Json(validations))
}

/// Score and store an idea submission.
#[utoipa::path(
    post,
    path = "/api/founder/validations",
    request_body = SubmitIdeaBody,
    responses(
        (status = 201, description = "Scored submission", body = IdeaValidation),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or company", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["validations"],
    operation_id = "submitIdeaValidation"
)]
#[post("/founder/validations")]
pub async fn submit_validation(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitIdeaBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let company_id = body
        .company_id
        .map(|raw| parse_uuid(&raw, COMPANY_ID_FIELD))
        .transpose()?;

    let validation = state
        .validations
        .submit(SubmitIdeaRequest {
            civic_id,
            company_id,
            idea_text: body.idea_text,
        })
        .await?;
    Ok(HttpResponse::Created().json(validation))
}

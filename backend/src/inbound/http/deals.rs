//! Investor deal-flow handlers.
//!
//! ```text
//! GET /api/investor/deals?civicId=...
//! POST /api/investor/deals {"civicId":"...","companyId":"...","status":"funded","investmentAmount":50000}
//! ```
//!
//! Supports idempotent funding via the `Idempotency-Key` header: a retry with
//! the same key and payload replays the stored deal (200), a retry with a
//! different payload is a 409.

use std::str::FromStr;

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{DealFlow, DealStatus, Error, FundDealRequest, FundDealResponse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::idempotency::idempotency_key_from_headers;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_civic_id, parse_uuid, require_param,
};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");
const COMPANY_ID_FIELD: FieldName = FieldName::new("companyId");
const STATUS_FIELD: FieldName = FieldName::new("status");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicIdQuery {
    civic_id: Option<String>,
}

/// Deal funding body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundDealBody {
    pub civic_id: String,
    pub company_id: String,
    pub status: String,
    pub investment_amount: i64,
}

/// List an investor's deal pipeline with chain-sync state.
#[utoipa::path(
    get,
    path = "/api/investor/deals",
    params(("civicId" = String, Query, description = "Investor's civic id")),
    responses(
        (status = 200, description = "Deals", body = [DealFlow]),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["deals"],
    operation_id = "listDeals"
)]
#[get("/investor/deals")]
pub async fn list_deals(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<Vec<DealFlow>>> {
    let raw = require_param(query.into_inner().civic_id, CIVIC_ID_FIELD)?;
    let civic_id = parse_civic_id(&raw, CIVIC_ID_FIELD)?;
    let deals = state.funding.list(&civic_id).await?;
    Ok(web::Json(deals))
}

/// Record a funded deal.
///
/// # Idempotency
///
/// Clients may provide an `Idempotency-Key` header (UUID format) for safe
/// retries:
///
/// - First request: `201 Created` with the recorded deal.
/// - Duplicate with the same payload: `200 OK` with the original deal and
///   `"replayed": true`.
/// - Duplicate with a different payload: `409 Conflict`.
#[utoipa::path(
    post,
    path = "/api/investor/deals",
    request_body = FundDealBody,
    responses(
        (status = 201, description = "Deal recorded", body = FundDealResponse),
        (status = 200, description = "Replayed earlier identical request", body = FundDealResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or company", body = Error),
        (status = 409, description = "Idempotency key conflict", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "UUID for idempotent funding")
    ),
    tags = ["deals"],
    operation_id = "fundDeal"
)]
#[post("/investor/deals")]
pub async fn fund_deal(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<FundDealBody>,
) -> ApiResult<HttpResponse> {
    let idempotency_key = idempotency_key_from_headers(request.headers())?;
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let company_id = parse_uuid(&body.company_id, COMPANY_ID_FIELD)?;
    let status = DealStatus::from_str(&body.status)
        .map_err(|err| invalid_value_error(STATUS_FIELD, &body.status, err.to_string()))?;

    let response = state
        .funding
        .fund(FundDealRequest {
            civic_id,
            company_id,
            status,
            investment_amount: body.investment_amount,
            idempotency_key,
        })
        .await?;

    if response.replayed {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::Created().json(response))
    }
}

//! User account handlers.
//!
//! ```text
//! GET /api/users?civicId=...
//! POST /api/users {"civicId":"...","email":"...","name":"...","activeRoles":["founder"]}
//! POST /api/users/roles {"civicId":"...","activeRoles":["founder","investor"]}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CivicId, EmailAddress, Error, PersonaName, RegisterUserRequest, User, UserRole,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_civic_id, require_param,
};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");
const ACTIVE_ROLES_FIELD: FieldName = FieldName::new("activeRoles");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicIdQuery {
    civic_id: Option<String>,
}

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    pub civic_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub active_roles: Vec<String>,
}

/// Role update request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolesBody {
    pub civic_id: String,
    pub active_roles: Vec<String>,
}

fn parse_roles(raw: Vec<String>) -> Result<Vec<UserRole>, Error> {
    raw.iter()
        .map(|value| {
            UserRole::from_str(value)
                .map_err(|err| invalid_value_error(ACTIVE_ROLES_FIELD, value, err.to_string()))
        })
        .collect()
}

fn resolve_query_civic_id(query: CivicIdQuery) -> Result<CivicId, Error> {
    let raw = require_param(query.civic_id, CIVIC_ID_FIELD)?;
    parse_civic_id(&raw, CIVIC_ID_FIELD)
}

/// Look up a user by civic identity.
#[utoipa::path(
    get,
    path = "/api/users",
    params(("civicId" = String, Query, description = "External identity-provider id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Missing or invalid civicId", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "lookupUser"
)]
#[get("/users")]
pub async fn lookup_user(
    state: web::Data<HttpState>,
    query: web::Query<CivicIdQuery>,
) -> ApiResult<web::Json<User>> {
    let civic_id = resolve_query_civic_id(query.into_inner())?;
    let user = state.accounts_query.fetch_user(&civic_id).await?;
    Ok(web::Json(user))
}

/// Register a user under a civic identity.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Civic id already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let email = EmailAddress::new(body.email.clone())
        .map_err(|err| invalid_value_error(FieldName::new("email"), &body.email, err.to_string()))?;
    let name = PersonaName::new(body.name.clone())
        .map_err(|err| invalid_value_error(FieldName::new("name"), &body.name, err.to_string()))?;
    let active_roles = parse_roles(body.active_roles)?;

    let user = state
        .accounts
        .register(RegisterUserRequest {
            civic_id,
            email,
            name,
            active_roles,
        })
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace the active role set of a user (onboarding step one).
#[utoipa::path(
    post,
    path = "/api/users/roles",
    request_body = UpdateRolesBody,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserRoles"
)]
#[post("/users/roles")]
pub async fn update_roles(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateRolesBody>,
) -> ApiResult<web::Json<User>> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let roles = parse_roles(body.active_roles)?;
    let user = state.accounts.update_roles(&civic_id, roles).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{fixture_state, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn register_then_lookup_round_trips() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "civicId": "civic-1",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "activeRoles": ["founder"]
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let lookup = actix_test::TestRequest::get()
            .uri("/api/users?civicId=civic-1")
            .to_request();
        let response = actix_test::call_service(&app, lookup).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("civicId").and_then(Value::as_str),
            Some("civic-1")
        );
        assert_eq!(
            body.get("activeRoles").and_then(Value::as_array).map(Vec::len),
            Some(1)
        );
    }

    #[actix_web::test]
    async fn lookup_without_civic_id_is_a_bad_request() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/users").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details present");
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("civicId")
        );
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("missing_field")
        );
    }

    #[actix_web::test]
    async fn lookup_of_an_unknown_user_is_not_found() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users?civicId=civic-ghost")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn registering_with_an_unknown_role_is_a_bad_request() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "civicId": "civic-1",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "activeRoles": ["wizard"]
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/value").and_then(Value::as_str),
            Some("wizard")
        );
    }

    #[actix_web::test]
    async fn role_updates_replace_the_active_set() {
        let (state, backend) = fixture_state();
        seed_user(&backend, "civic-1", &[crate::domain::UserRole::Founder]);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users/roles")
            .set_json(json!({
                "civicId": "civic-1",
                "activeRoles": ["founder", "investor"]
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let roles = body
            .get("activeRoles")
            .and_then(Value::as_array)
            .expect("roles array");
        assert_eq!(roles.len(), 2);
    }
}

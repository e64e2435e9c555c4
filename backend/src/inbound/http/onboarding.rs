//! Stepped onboarding handlers.
//!
//! ```text
//! POST /api/onboarding/validate {"role":"investor","step":1,"form":{...}}
//! POST /api/onboarding/submit {"civicId":"...","role":"investor","form":{...}}
//! ```

use std::str::FromStr;

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, OnboardingForm, OnboardingOutcome, OnboardingStepValidation, OnboardingSubmission,
    UserRole,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, parse_civic_id};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");
const ROLE_FIELD: FieldName = FieldName::new("role");

/// Step validation body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStepBody {
    pub role: String,
    pub step: usize,
    #[serde(default)]
    pub form: OnboardingForm,
}

/// Final submission body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOnboardingBody {
    pub civic_id: String,
    pub role: String,
    #[serde(default)]
    pub form: OnboardingForm,
}

fn parse_role(raw: &str) -> Result<UserRole, Error> {
    UserRole::from_str(raw).map_err(|err| invalid_value_error(ROLE_FIELD, raw, err.to_string()))
}

/// Validate a single onboarding step for a role.
#[utoipa::path(
    post,
    path = "/api/onboarding/validate",
    request_body = ValidateStepBody,
    responses(
        (status = 200, description = "Step is complete", body = OnboardingStepValidation),
        (status = 400, description = "Invalid step or missing fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["onboarding"],
    operation_id = "validateOnboardingStep"
)]
#[post("/onboarding/validate")]
pub async fn validate_step(
    state: web::Data<HttpState>,
    payload: web::Json<ValidateStepBody>,
) -> ApiResult<web::Json<OnboardingStepValidation>> {
    let body = payload.into_inner();
    let role = parse_role(&body.role)?;
    let validation = state
        .onboarding
        .validate_step(role, body.step, body.form)
        .await?;
    Ok(web::Json(validation))
}

/// Validate every step, activate the role, and store the profile.
#[utoipa::path(
    post,
    path = "/api/onboarding/submit",
    request_body = SubmitOnboardingBody,
    responses(
        (status = 200, description = "Role activated and profile stored", body = OnboardingOutcome),
        (status = 400, description = "Invalid or incomplete form", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["onboarding"],
    operation_id = "submitOnboarding"
)]
#[post("/onboarding/submit")]
pub async fn submit_onboarding(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitOnboardingBody>,
) -> ApiResult<web::Json<OnboardingOutcome>> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let role = parse_role(&body.role)?;
    let outcome = state
        .onboarding
        .submit(OnboardingSubmission {
            civic_id,
            role,
            form: body.form,
        })
        .await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole as Role;
    use crate::inbound::http::test_utils::{fixture_state, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn a_complete_step_validates() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/onboarding/validate")
            .set_json(json!({
                "role": "investor",
                "step": 1,
                "form": { "firmName": "Lovelace Capital" }
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("valid").and_then(Value::as_bool), Some(true));
    }

    #[actix_web::test]
    async fn missing_fields_are_named_in_the_error_details() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/onboarding/validate")
            .set_json(json!({
                "role": "investor",
                "step": 2,
                "form": { "checkSizeMin": 10_000 }
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let missing = body
            .pointer("/details/missingFields")
            .and_then(Value::as_array)
            .expect("missing fields listed");
        assert!(missing.iter().any(|v| v.as_str() == Some("checkSizeMax")));
    }

    #[actix_web::test]
    async fn submit_activates_the_role_and_stores_the_profile() {
        let (state, backend) = fixture_state();
        seed_user(&backend, "civic-1", &[Role::Founder]);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/onboarding/submit")
            .set_json(json!({
                "civicId": "civic-1",
                "role": "jobseeker",
                "form": {
                    "skills": ["rust"],
                    "experienceLevel": "senior"
                }
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let roles = body
            .pointer("/user/activeRoles")
            .and_then(Value::as_array)
            .expect("roles array");
        assert!(roles.iter().any(|v| v.as_str() == Some("jobseeker")));
        assert_eq!(
            body.pointer("/profile/experienceLevel").and_then(Value::as_str),
            Some("senior")
        );

        let profile = actix_test::TestRequest::get()
            .uri("/api/jobseeker/profile?civicId=civic-1")
            .to_request();
        let response = actix_test::call_service(&app, profile).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn an_unknown_role_string_is_a_bad_request() {
        let (state, _backend) = fixture_state();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/onboarding/validate")
            .set_json(json!({ "role": "wizard", "step": 1, "form": {} }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("role")
        );
    }
}

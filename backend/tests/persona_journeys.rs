//! End-to-end persona journeys driven purely over the HTTP API.
//!
//! Unlike the handler tests, nothing is seeded behind the scenes: every
//! actor registers, onboards, and acts through the same endpoints a client
//! would call.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use support::{fixture_state, test_app};

#[actix_web::test]
async fn a_founder_registers_builds_a_company_and_sees_it_on_the_dashboard() {
    let (state, _backend) = fixture_state();
    let app = actix_test::init_service(test_app(state)).await;

    let register = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "civicId": "civic-ada",
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "activeRoles": ["founder"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, register).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let profile = actix_test::TestRequest::post()
        .uri("/api/founder/profile")
        .set_json(json!({
            "civicId": "civic-ada",
            "companyCount": 1,
            "cofounders": ["Charles Babbage"],
            "bio": "Building computation engines.",
            "achievements": ["First program"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, profile).await;
    assert_eq!(response.status(), StatusCode::OK);

    let create_company = actix_test::TestRequest::post()
        .uri("/api/company")
        .set_json(json!({
            "civicId": "civic-ada",
            "name": "Analytical Engines Ltd",
            "industry": "devtools",
            "stage": "seed",
            "valuation": 2_000_000
        }))
        .to_request();
    let response = actix_test::call_service(&app, create_company).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let submit_idea = actix_test::TestRequest::post()
        .uri("/api/founder/validations")
        .set_json(json!({
            "civicId": "civic-ada",
            "ideaText": "A marketplace connecting hardware founders with fab capacity."
        }))
        .to_request();
    let response = actix_test::call_service(&app, submit_idea).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let dashboard = actix_test::TestRequest::get()
        .uri("/api/founder/dashboard?civicId=civic-ada")
        .to_request();
    let response = actix_test::call_service(&app, dashboard).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("onboardingRequired").and_then(Value::as_bool),
        Some(false)
    );
    assert_eq!(
        body.get("companies").and_then(Value::as_array).map(Vec::len),
        Some(1)
    );
    assert_eq!(
        body.get("validations")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
    assert_eq!(
        body.get("degraded").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

#[actix_web::test]
async fn a_jobseeker_onboards_applies_and_is_hired() {
    let (state, _backend) = fixture_state();
    let app = actix_test::init_service(test_app(state)).await;

    // The founder side: an account, a company, and an open posting.
    let register_founder = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "civicId": "civic-founder",
            "email": "founder@example.com",
            "name": "Grace Hopper",
            "activeRoles": ["founder"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, register_founder).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let create_company = actix_test::TestRequest::post()
        .uri("/api/company")
        .set_json(json!({
            "civicId": "civic-founder",
            "name": "Compiler Works",
            "industry": "devtools",
            "stage": "series-a",
            "valuation": 20_000_000
        }))
        .to_request();
    let response = actix_test::call_service(&app, create_company).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let company: Value = actix_test::read_body_json(response).await;
    let company_id = company.get("id").and_then(Value::as_str).expect("company id");

    let create_posting = actix_test::TestRequest::post()
        .uri("/api/company/jobs")
        .set_json(json!({
            "companyId": company_id,
            "title": "Systems Engineer",
            "skillsRequired": ["rust", "postgres"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, create_posting).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let posting: Value = actix_test::read_body_json(response).await;
    let posting_id = posting.get("id").and_then(Value::as_str).expect("posting id");

    // The jobseeker side: register, onboard through the wizard, apply.
    let register_seeker = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "civicId": "civic-seeker",
            "email": "seeker@example.com",
            "name": "Mary Somerville",
            "activeRoles": []
        }))
        .to_request();
    let response = actix_test::call_service(&app, register_seeker).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let onboard = actix_test::TestRequest::post()
        .uri("/api/onboarding/submit")
        .set_json(json!({
            "civicId": "civic-seeker",
            "role": "jobseeker",
            "form": {
                "skills": ["rust", "sql"],
                "experienceLevel": "senior"
            }
        }))
        .to_request();
    let response = actix_test::call_service(&app, onboard).await;
    assert_eq!(response.status(), StatusCode::OK);
    let onboarded: Value = actix_test::read_body_json(response).await;
    let roles = onboarded
        .pointer("/user/activeRoles")
        .and_then(Value::as_array)
        .expect("roles listed");
    assert!(roles.iter().any(|role| role.as_str() == Some("jobseeker")));

    let apply = actix_test::TestRequest::post()
        .uri("/api/jobseeker/applications")
        .set_json(json!({
            "civicId": "civic-seeker",
            "jobPostingId": posting_id,
            "coverLetter": "I have shipped compilers before."
        }))
        .to_request();
    let response = actix_test::call_service(&app, apply).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application: Value = actix_test::read_body_json(response).await;
    let application_id = application
        .get("id")
        .and_then(Value::as_str)
        .expect("application id");

    // Review pipeline: applied -> interview -> accepted.
    for status in ["interview", "accepted"] {
        let update = actix_test::TestRequest::put()
            .uri("/api/company/applications")
            .set_json(json!({ "applicationId": application_id, "status": status }))
            .to_request();
        let response = actix_test::call_service(&app, update).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let dashboard = actix_test::TestRequest::get()
        .uri("/api/jobseeker/dashboard?civicId=civic-seeker")
        .to_request();
    let response = actix_test::call_service(&app, dashboard).await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("onboardingRequired").and_then(Value::as_bool),
        Some(false)
    );
    assert_eq!(
        body.pointer("/applications/0/status").and_then(Value::as_str),
        Some("accepted")
    );
    assert_eq!(
        body.get("openPostings")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[actix_web::test]
async fn an_investor_adds_a_second_role_and_completes_a_profile() {
    let (state, _backend) = fixture_state();
    let app = actix_test::init_service(test_app(state)).await;

    let register = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({
            "civicId": "civic-investor",
            "email": "investor@example.com",
            "name": "Hetty Green",
            "activeRoles": ["founder"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, register).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let update_roles = actix_test::TestRequest::post()
        .uri("/api/users/roles")
        .set_json(json!({
            "civicId": "civic-investor",
            "activeRoles": ["founder", "investor"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, update_roles).await;
    assert_eq!(response.status(), StatusCode::OK);

    let profile = actix_test::TestRequest::post()
        .uri("/api/investor/profile")
        .set_json(json!({
            "civicId": "civic-investor",
            "firmName": "Green Capital",
            "checkSizeMin": 25_000,
            "checkSizeMax": 250_000,
            "preferredStages": ["seed", "series-a"],
            "preferredIndustries": ["devtools"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, profile).await;
    assert_eq!(response.status(), StatusCode::OK);

    let lookup = actix_test::TestRequest::get()
        .uri("/api/users?civicId=civic-investor")
        .to_request();
    let response = actix_test::call_service(&app, lookup).await;
    let user: Value = actix_test::read_body_json(response).await;
    let roles = user
        .get("activeRoles")
        .and_then(Value::as_array)
        .expect("roles listed");
    assert_eq!(roles.len(), 2);

    let fetch_profile = actix_test::TestRequest::get()
        .uri("/api/investor/profile?civicId=civic-investor")
        .to_request();
    let response = actix_test::call_service(&app, fetch_profile).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        profile.get("firmName").and_then(Value::as_str),
        Some("Green Capital")
    );
}

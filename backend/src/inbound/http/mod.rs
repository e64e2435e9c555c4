//! HTTP inbound adapter exposing REST endpoints.

pub mod applications;
pub mod community;
pub mod companies;
pub mod dashboards;
pub mod deals;
pub mod error;
pub mod health;
pub mod idempotency;
pub mod jobs;
pub mod onboarding;
pub mod profiles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod validations;

pub use error::ApiResult;

use actix_web::web;

/// Mount every `/api` endpoint on the given service config.
///
/// Health probes are registered separately because they sit outside the
/// `/api` scope and carry their own state.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(users::lookup_user)
            .service(users::register_user)
            .service(users::update_roles)
            .service(profiles::get_founder_profile)
            .service(profiles::upsert_founder_profile)
            .service(profiles::get_investor_profile)
            .service(profiles::upsert_investor_profile)
            .service(profiles::get_jobseeker_profile)
            .service(profiles::upsert_jobseeker_profile)
            .service(companies::list_companies)
            .service(companies::create_company)
            .service(jobs::list_postings)
            .service(jobs::create_posting)
            .service(applications::list_company_applications)
            .service(applications::admit_application)
            .service(applications::update_application_status)
            .service(applications::submit_application)
            .service(applications::list_jobseeker_applications)
            .service(validations::list_validations)
            .service(validations::submit_validation)
            .service(deals::list_deals)
            .service(deals::fund_deal)
            .service(community::list_posts)
            .service(community::create_post)
            .service(community::toggle_like)
            .service(dashboards::founder_dashboard)
            .service(dashboards::investor_dashboard)
            .service(dashboards::jobseeker_dashboard)
            .service(onboarding::validate_step)
            .service(onboarding::submit_onboarding),
    );
}

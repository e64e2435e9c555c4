//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/live
//! GET /health/ready
//! ```
//!
//! Liveness always succeeds while the process is serving requests. Readiness
//! flips on once the server has built its connection pool and mounted the
//! workers, so orchestrators hold traffic during startup.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, web};
use serde_json::json;

/// Shared readiness flag for the probe endpoints.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a not-yet-ready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the process ready to receive traffic.
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether startup has completed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Mount the probe endpoints with the given state.
pub fn configure_health(cfg: &mut web::ServiceConfig, state: HealthState) {
    cfg.app_data(web::Data::new(state))
        .service(live)
        .service(ready);
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is alive")),
    tags = ["health"],
    operation_id = "healthLive"
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Still starting up")
    ),
    tags = ["health"],
    operation_id = "healthReady"
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "starting" }))
    }
}

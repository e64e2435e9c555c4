//! HTTP server assembly: app construction, binding, and startup wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "demo-data")]
mod seeding;
mod state_builders;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::health::{HealthState, configure_health};
use backend::inbound::http::{configure_api, state::HttpState};
use backend::middleware::Trace;

#[cfg(feature = "demo-data")]
pub(crate) use config::DemoDataSettings;
pub(crate) use config::{AppSettings, ChainSettings, ServerConfig};
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
#[cfg(feature = "demo-data")]
pub(crate) use seeding::seed_demo_data;
#[cfg(feature = "demo-data")]
pub(crate) use state_builders::BackendHandles;
pub(crate) use state_builders::build_backend;

/// Build one worker's application instance.
fn build_app(
    health_state: HealthState,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .configure(move |cfg| configure_health(cfg, health_state));

    #[cfg(debug_assertions)]
    let app = app
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server over the prepared state.
///
/// The returned server is not yet running; the caller marks readiness and
/// awaits it, so probes flip only after a successful bind.
pub(crate) fn create_server(
    health_state: HealthState,
    http_state: web::Data<HttpState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus.clone());

    let server = HttpServer::new(move || {
        let app = build_app(health_state.clone(), http_state.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());
        app
    })
    .bind(config.bind_addr)?;

    Ok(server.run())
}

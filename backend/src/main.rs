//! Backend entry-point: settings, persistence, worker, and HTTP wiring.

mod server;

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use reqwest::Url;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(not(feature = "metrics"))]
use backend::domain::ports::NoOpChainSyncMetrics;
use backend::domain::ports::{ChainSyncMetrics, CompanyRepository, DealFlowRepository};
use backend::domain::{ChainSyncWorker, ChainSyncWorkerPorts};
use backend::inbound::http::health::HealthState;
use backend::outbound::chain::HttpChainRelay;
use backend::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, ChainSettings, ServerConfig, build_backend, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let app_settings = AppSettings::load().wrap_err("failed to load application settings")?;
    let chain_settings = ChainSettings::load().wrap_err("failed to load chain settings")?;

    let bind_addr = app_settings
        .bind_addr()
        .wrap_err("invalid bind host or port")?;

    let db_pool = match app_settings.pool_config() {
        Some(pool_config) => {
            let database_url = app_settings
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("pool configured without a database URL"))?;
            run_pending_migrations(database_url)
                .await
                .wrap_err("database migrations failed")?;
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("database pool construction failed")?;
            Some(pool)
        }
        None => {
            warn!("no database configured, serving fixture-backed state");
            None
        }
    };

    #[cfg(feature = "metrics")]
    let registry = prometheus::Registry::new();

    let mut config =
        ServerConfig::new(bind_addr).with_chain_sync(chain_settings.sync_enabled());
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(server::make_metrics(&registry));
    }

    let handles = build_backend(&config);

    #[cfg(feature = "demo-data")]
    seed_if_enabled(&handles).await?;

    let shutdown = if chain_settings.sync_enabled() {
        #[cfg(feature = "metrics")]
        let metrics: Arc<dyn ChainSyncMetrics> = Arc::new(
            backend::outbound::metrics::PrometheusChainSyncMetrics::new(&registry)
                .wrap_err("chain sync metric registration failed")?,
        );
        #[cfg(not(feature = "metrics"))]
        let metrics: Arc<dyn ChainSyncMetrics> = Arc::new(NoOpChainSyncMetrics);

        Some(spawn_chain_sync_worker(
            &chain_settings,
            handles.deals.clone(),
            handles.companies.clone(),
            metrics,
        )?)
    } else {
        info!("chain sync disabled, funded deals stay off-chain");
        None
    };

    let health_state = HealthState::new();
    let server = create_server(health_state.clone(), handles.http_state.clone(), &config)?;
    health_state.set_ready();
    info!(%bind_addr, "server started");

    let outcome = server.await;
    if let Some(shutdown) = shutdown {
        let _ = shutdown.send(true);
    }
    outcome.wrap_err("server terminated abnormally")
}

/// Spawn the deal sync worker and return its shutdown handle.
fn spawn_chain_sync_worker(
    settings: &ChainSettings,
    deals: Arc<dyn DealFlowRepository>,
    companies: Arc<dyn CompanyRepository>,
    metrics: Arc<dyn ChainSyncMetrics>,
) -> Result<watch::Sender<bool>> {
    let relay_url = settings
        .relay_url
        .as_deref()
        .ok_or_else(|| eyre!("chain sync enabled without a relay URL"))?;
    let relay_url = Url::parse(relay_url).wrap_err("invalid relay URL")?;
    let gateway = Arc::new(
        HttpChainRelay::with_timeout(relay_url.clone(), settings.request_timeout())
            .wrap_err("chain relay construction failed")?,
    );

    let worker = ChainSyncWorker::new(
        ChainSyncWorkerPorts::new(gateway, deals, companies, metrics),
        Arc::new(mockable::DefaultClock),
        settings.worker_config(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        worker.run_until_shutdown(shutdown_rx).await;
    });
    info!(
        relay = %relay_url,
        contract = settings.contract_address.as_deref().unwrap_or("unset"),
        "chain sync worker started"
    );
    Ok(shutdown_tx)
}

#[cfg(feature = "demo-data")]
async fn seed_if_enabled(handles: &server::BackendHandles) -> Result<()> {
    let settings =
        server::DemoDataSettings::load().wrap_err("failed to load demo data settings")?;
    if settings.enabled {
        server::seed_demo_data(handles, &settings.cohort_config()).await?;
    }
    Ok(())
}

//! Runtime settings loaded via OrthoConfig plus the server wiring config.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::domain::ChainSyncWorkerConfig;
use backend::outbound::persistence::{DbPool, PoolConfig};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_RELAY_TIMEOUT_SECONDS: u64 = 30;

/// Application-level settings controlling binding and persistence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Host address the HTTP server binds to.
    pub host: Option<String>,
    /// Port the HTTP server binds to.
    pub port: Option<u16>,
    /// PostgreSQL connection URL; fixture adapters serve when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_max_size: Option<u32>,
    /// Minimum number of idle pooled connections.
    pub db_pool_min_idle: Option<u32>,
}

impl AppSettings {
    /// Resolve the socket address to bind, applying defaults.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let host: IpAddr = self
            .host
            .as_deref()
            .unwrap_or(DEFAULT_BIND_HOST)
            .parse()?;
        Ok(SocketAddr::new(host, self.port.unwrap_or(DEFAULT_BIND_PORT)))
    }

    /// Build a pool configuration for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let database_url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.db_pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.db_pool_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        Some(config)
    }
}

/// Settings for the on-chain relay and the deal sync worker.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHAIN")]
pub struct ChainSettings {
    /// Enable on-chain mirroring; funded deals stay `not-requested` otherwise.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Base URL of the relay fronting wallet and contract interactions.
    pub relay_url: Option<String>,
    /// Contract address forwarded to the relay operators for reference.
    pub contract_address: Option<String>,
    /// Relay request timeout in seconds.
    pub request_timeout_seconds: Option<u64>,
    /// Idle delay between worker passes, in seconds.
    pub poll_interval_seconds: Option<u64>,
    /// Pending deals claimed per worker pass.
    pub batch_size: Option<usize>,
    /// Maximum relay attempts per deal, including the first call.
    pub max_attempts: Option<u32>,
    /// Initial retry backoff in milliseconds.
    pub initial_backoff_ms: Option<u64>,
    /// Retry backoff cap in milliseconds.
    pub max_backoff_ms: Option<u64>,
    /// Consecutive failures before the circuit opens.
    pub circuit_failure_threshold: Option<u32>,
    /// Open-circuit cooldown before a half-open probe, in seconds.
    pub circuit_open_cooldown_seconds: Option<u64>,
}

impl ChainSettings {
    /// Whether deals should be mirrored on chain.
    ///
    /// Requires both the enabled flag and a relay URL; a flag without a
    /// relay to talk to cannot sync anything.
    pub fn sync_enabled(&self) -> bool {
        self.enabled && self.relay_url.is_some()
    }

    /// Relay request timeout, applying the default.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_seconds
                .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECONDS),
        )
    }

    /// Worker tuning derived from these settings over the built-in defaults.
    pub fn worker_config(&self) -> ChainSyncWorkerConfig {
        let defaults = ChainSyncWorkerConfig::default();
        ChainSyncWorkerConfig {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self
                .initial_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
            max_backoff: self
                .max_backoff_ms
                .map_or(defaults.max_backoff, Duration::from_millis),
            circuit_failure_threshold: self
                .circuit_failure_threshold
                .unwrap_or(defaults.circuit_failure_threshold),
            circuit_open_cooldown: self
                .circuit_open_cooldown_seconds
                .map_or(defaults.circuit_open_cooldown, Duration::from_secs),
            poll_interval: self
                .poll_interval_seconds
                .map_or(defaults.poll_interval, Duration::from_secs),
        }
    }
}

/// Settings controlling demo data seeding at startup.
#[cfg(feature = "demo-data")]
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEMO_DATA")]
pub struct DemoDataSettings {
    /// Enable demo cohort seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// RNG seed; equal seeds produce equal cohorts.
    pub seed: Option<u64>,
    /// Number of founder personas to generate.
    pub founder_count: Option<usize>,
    /// Number of investor personas to generate.
    pub investor_count: Option<usize>,
    /// Number of jobseeker personas to generate.
    pub jobseeker_count: Option<usize>,
    /// Number of community posts to generate.
    pub post_count: Option<usize>,
}

#[cfg(feature = "demo-data")]
impl DemoDataSettings {
    /// Cohort shape for the generator, applying defaults per field.
    pub fn cohort_config(&self) -> demo_data::CohortConfig {
        let defaults = demo_data::CohortConfig::default();
        demo_data::CohortConfig {
            seed: self.seed.unwrap_or(defaults.seed),
            founder_count: self.founder_count.unwrap_or(defaults.founder_count),
            investor_count: self.investor_count.unwrap_or(defaults.investor_count),
            jobseeker_count: self.jobseeker_count.unwrap_or(defaults.jobseeker_count),
            post_count: self.post_count.unwrap_or(defaults.post_count),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) chain_sync_enabled: bool,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration for the given bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            chain_sync_enabled: false,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed repositories;
    /// otherwise fixture adapters serve in-memory state.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Record whether funded deals should queue for on-chain sync.
    #[must_use]
    pub fn with_chain_sync(mut self, enabled: bool) -> Self {
        self.chain_sync_enabled = enabled;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}

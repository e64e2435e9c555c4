//! Port and runtime dependency bundles for the chain sync worker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::ports::{ChainGateway, ChainSyncMetrics, CompanyRepository, DealFlowRepository};

use super::{BackoffJitter, SyncSleeper};

/// Port bundle required by the chain sync worker.
pub struct ChainSyncWorkerPorts {
    /// Outbound chain relay adapter.
    pub gateway: Arc<dyn ChainGateway>,
    /// Deal persistence adapter.
    pub deals: Arc<dyn DealFlowRepository>,
    /// Company lookups for relay submissions.
    pub companies: Arc<dyn CompanyRepository>,
    /// Sync metrics adapter.
    pub metrics: Arc<dyn ChainSyncMetrics>,
}

impl ChainSyncWorkerPorts {
    /// Build a strongly-typed worker port bundle.
    pub fn new(
        gateway: Arc<dyn ChainGateway>,
        deals: Arc<dyn DealFlowRepository>,
        companies: Arc<dyn CompanyRepository>,
        metrics: Arc<dyn ChainSyncMetrics>,
    ) -> Self {
        Self {
            gateway,
            deals,
            companies,
            metrics,
        }
    }
}

/// Runtime helpers used by retry policy.
pub struct ChainSyncWorkerRuntime {
    /// Async sleep implementation.
    pub sleeper: Arc<dyn SyncSleeper>,
    /// Jitter strategy for retry delays.
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for ChainSyncWorkerRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(AttemptJitter),
        }
    }
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl SyncSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Default jitter strategy adding up to a quarter of the base delay.
///
/// The RNG is seeded from the supplied clock reading and attempt number so
/// tests driving a fixed clock observe stable delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttemptJitter;

impl BackoffJitter for AttemptJitter {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let max_extra = (base_ms / 4).max(1);
        let seed = u64::from(now.timestamp_subsec_nanos()) ^ u64::from(attempt);
        let mut rng = SmallRng::seed_from_u64(seed);
        let extra = rng.gen_range(0..=max_extra);
        Duration::from_millis(base_ms.saturating_add(extra))
    }
}

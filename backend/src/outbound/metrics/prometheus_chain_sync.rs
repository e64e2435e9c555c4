//! Prometheus adapter for chain sync job counters.
//!
//! This adapter writes two counter families so dashboards can query either a
//! shared multi-job metric (`jobs_total`) or a sync-focused metric
//! (`chain_sync_jobs_total`, labelled by failure reason) without domain
//! coupling.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{
    ChainSyncFailure, ChainSyncMetrics, ChainSyncMetricsError, ChainSyncSuccess,
};

const CHAIN_SYNC_TYPE_LABEL: &str = "ChainSync";
const NO_REASON_LABEL: &str = "none";

/// Prometheus-backed recorder for chain sync job outcomes.
pub struct PrometheusChainSyncMetrics {
    jobs_total: CounterVec,
    chain_sync_jobs_total: CounterVec,
}

impl PrometheusChainSyncMetrics {
    /// Create and register counters with the provided registry.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects metric registration.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let jobs_total = CounterVec::new(
            Opts::new("jobs_total", "Total jobs by type and status"),
            &["type", "status"],
        )?;
        let chain_sync_jobs_total = CounterVec::new(
            Opts::new(
                "chain_sync_jobs_total",
                "Total chain sync jobs by status and failure reason",
            ),
            &["status", "reason"],
        )?;
        registry.register(Box::new(jobs_total.clone()))?;
        registry.register(Box::new(chain_sync_jobs_total.clone()))?;
        Ok(Self {
            jobs_total,
            chain_sync_jobs_total,
        })
    }

    fn record(&self, status: &str, reason: &str) {
        self.jobs_total
            .with_label_values(&[CHAIN_SYNC_TYPE_LABEL, status])
            .inc();
        self.chain_sync_jobs_total
            .with_label_values(&[status, reason])
            .inc();
    }
}

#[async_trait]
impl ChainSyncMetrics for PrometheusChainSyncMetrics {
    async fn record_success(
        &self,
        _payload: &ChainSyncSuccess,
    ) -> Result<(), ChainSyncMetricsError> {
        self.record("success", NO_REASON_LABEL);
        Ok(())
    }

    async fn record_failure(
        &self,
        payload: &ChainSyncFailure,
    ) -> Result<(), ChainSyncMetricsError> {
        self.record("failure", payload.kind.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for chain sync counters.

    use super::*;
    use crate::domain::ports::ChainSyncFailureKind;
    use rstest::rstest;

    fn make_metrics() -> (Registry, PrometheusChainSyncMetrics) {
        let registry = Registry::new();
        let metrics = PrometheusChainSyncMetrics::new(&registry)
            .expect("metric registration should succeed");
        (registry, metrics)
    }

    #[test]
    fn registers_counters_with_registry() {
        let (registry, metrics) = make_metrics();
        metrics.record("success", NO_REASON_LABEL);
        let families = registry.gather();

        assert!(
            families.iter().any(|metric| metric.name() == "jobs_total"),
            "jobs_total should be registered"
        );
        assert!(
            families
                .iter()
                .any(|metric| metric.name() == "chain_sync_jobs_total"),
            "chain_sync_jobs_total should be registered"
        );
    }

    #[tokio::test]
    async fn records_success_without_a_failure_reason() {
        let (_registry, metrics) = make_metrics();
        metrics
            .record_success(&ChainSyncSuccess { attempt_count: 1 })
            .await
            .expect("recording success should not fail");

        let counter = metrics
            .chain_sync_jobs_total
            .with_label_values(&["success", NO_REASON_LABEL]);
        assert_eq!(counter.get() as u64, 1);
    }

    #[rstest]
    #[case::circuit_open(ChainSyncFailureKind::CircuitOpen, "circuit_open")]
    #[case::retry_exhausted(ChainSyncFailureKind::RetryExhausted, "retry_exhausted")]
    #[case::relay_rejected(ChainSyncFailureKind::RelayRejected, "relay_rejected")]
    #[tokio::test]
    async fn records_failures_labelled_by_reason(
        #[case] kind: ChainSyncFailureKind,
        #[case] label: &str,
    ) {
        let (_registry, metrics) = make_metrics();
        metrics
            .record_failure(&ChainSyncFailure {
                attempt_count: 3,
                kind,
            })
            .await
            .expect("recording failure should not fail");

        let counter = metrics
            .chain_sync_jobs_total
            .with_label_values(&["failure", label]);
        assert_eq!(counter.get() as u64, 1);
    }
}

//! Domain port surface for chain sync success/failure counters.
//!
//! This keeps sync observability at the domain boundary so adapters can emit
//! Prometheus counters without leaking implementation details into worker
//! orchestration.

use async_trait::async_trait;

/// Errors exposed when recording chain sync metrics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainSyncMetricsError {
    /// Metric exporter rejected the write.
    #[error("chain sync metrics exporter failed: {message}")]
    Export {
        /// Description of the exporter failure.
        message: String,
    },
}

/// Failure reason labels for chain sync jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChainSyncFailureKind {
    /// Circuit breaker was open and short-circuited the call.
    CircuitOpen,
    /// Retry budget was exhausted for retryable relay errors.
    RetryExhausted,
    /// Relay returned a non-retryable failure.
    RelayRejected,
    /// Worker runtime state was unavailable (for example poisoned mutexes).
    InternalError,
    /// Persistence adapter could not record the sync outcome.
    PersistenceFailed,
}

impl ChainSyncFailureKind {
    /// Label value used by metric exporters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CircuitOpen => "circuit_open",
            Self::RetryExhausted => "retry_exhausted",
            Self::RelayRejected => "relay_rejected",
            Self::InternalError => "internal_error",
            Self::PersistenceFailed => "persistence_failed",
        }
    }
}

/// Success metric payload for one sync job execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSyncSuccess {
    /// Number of relay call attempts used by this job.
    pub attempt_count: u32,
}

/// Failure metric payload for one sync job execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSyncFailure {
    /// Number of relay call attempts used by this job.
    pub attempt_count: u32,
    /// Domain-level failure reason label.
    pub kind: ChainSyncFailureKind,
}

/// Metrics recording port for chain sync counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainSyncMetrics: Send + Sync {
    /// Record a successful sync job run.
    async fn record_success(
        &self,
        payload: &ChainSyncSuccess,
    ) -> Result<(), ChainSyncMetricsError>;

    /// Record a failed sync job run.
    async fn record_failure(
        &self,
        payload: &ChainSyncFailure,
    ) -> Result<(), ChainSyncMetricsError>;
}

/// No-op implementation used when metrics are disabled or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpChainSyncMetrics;

#[async_trait]
impl ChainSyncMetrics for NoOpChainSyncMetrics {
    async fn record_success(
        &self,
        _payload: &ChainSyncSuccess,
    ) -> Result<(), ChainSyncMetricsError> {
        Ok(())
    }

    async fn record_failure(
        &self,
        _payload: &ChainSyncFailure,
    ) -> Result<(), ChainSyncMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_op_metrics_accept_both_outcomes() {
        let metrics = NoOpChainSyncMetrics;
        metrics
            .record_success(&ChainSyncSuccess { attempt_count: 1 })
            .await
            .expect("success recorded");
        metrics
            .record_failure(&ChainSyncFailure {
                attempt_count: 3,
                kind: ChainSyncFailureKind::RetryExhausted,
            })
            .await
            .expect("failure recorded");
    }

    #[test]
    fn failure_kinds_have_stable_labels() {
        assert_eq!(ChainSyncFailureKind::CircuitOpen.as_str(), "circuit_open");
        assert_eq!(
            ChainSyncFailureKind::PersistenceFailed.as_str(),
            "persistence_failed"
        );
    }
}

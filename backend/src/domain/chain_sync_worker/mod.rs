//! Domain orchestration for the on-chain deal sync worker.
//!
//! Deals are recorded database-first and start in the pending sync state.
//! The worker claims pending deals in batches, submits them to the chain
//! relay, and resolves each to confirmed or failed. It owns call admission
//! (circuit breaker), retry policy (jittered exponential backoff), and
//! persistence through domain ports. A deal left pending by a breaker trip
//! or a transient persistence fault is picked up again on a later pass.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    ChainCompanySubmission, ChainDealSubmission, ChainGateway, ChainSyncFailure,
    ChainSyncFailureKind, ChainSyncMetrics, ChainSyncSuccess, CompanyRepository,
    DealFlowRepository,
};
use crate::domain::{ChainSyncState, Company, DealFlow, Error};

mod attempt_error;
mod policy;
mod runtime;

use attempt_error::AttemptError;
use policy::{AdmissionDecision, CircuitBreakerConfig, WorkerPolicyState};
pub use runtime::{AttemptJitter, ChainSyncWorkerPorts, ChainSyncWorkerRuntime, TokioSleeper};

/// Worker configuration controlling batching, retries, and breaker behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSyncWorkerConfig {
    /// Pending deals claimed per pass.
    pub batch_size: usize,
    /// Maximum relay call attempts per deal (including the first call).
    pub max_attempts: u32,
    /// Initial retry backoff.
    pub initial_backoff: Duration,
    /// Maximum retry backoff cap.
    pub max_backoff: Duration,
    /// Consecutive failure threshold before opening the circuit.
    pub circuit_failure_threshold: u32,
    /// Open-state cooldown before allowing a half-open probe.
    pub circuit_open_cooldown: Duration,
    /// Idle delay between passes of the polling loop.
    pub poll_interval: Duration,
}

impl Default for ChainSyncWorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            circuit_failure_threshold: 3,
            circuit_open_cooldown: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Summary of one worker pass over the pending backlog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSyncPassReport {
    /// Pending deals claimed this pass.
    pub claimed: usize,
    /// Deals confirmed on chain.
    pub confirmed: usize,
    /// Deals marked failed after exhausting their options.
    pub failed: usize,
    /// Deals left pending for a later pass.
    pub deferred: usize,
}

/// Async clock-independent sleeping abstraction for retries.
#[async_trait]
pub trait SyncSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Retry backoff jitter abstraction.
pub trait BackoffJitter: Send + Sync {
    /// Return a jittered delay from the exponential base delay.
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

enum DealSyncOutcome {
    Confirmed,
    Failed,
    Deferred,
}

/// Domain-owned chain sync worker.
pub struct ChainSyncWorker {
    gateway: Arc<dyn ChainGateway>,
    deals: Arc<dyn DealFlowRepository>,
    companies: Arc<dyn CompanyRepository>,
    metrics: Arc<dyn ChainSyncMetrics>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn SyncSleeper>,
    jitter: Arc<dyn BackoffJitter>,
    config: ChainSyncWorkerConfig,
    policy_state: Mutex<WorkerPolicyState>,
}

impl ChainSyncWorker {
    /// Build a worker using default runtime dependencies.
    pub fn new(
        ports: ChainSyncWorkerPorts,
        clock: Arc<dyn Clock>,
        config: ChainSyncWorkerConfig,
    ) -> Self {
        Self::with_runtime(ports, clock, ChainSyncWorkerRuntime::default(), config)
    }

    /// Build a worker with injected runtime abstractions.
    pub fn with_runtime(
        ports: ChainSyncWorkerPorts,
        clock: Arc<dyn Clock>,
        runtime: ChainSyncWorkerRuntime,
        config: ChainSyncWorkerConfig,
    ) -> Self {
        let policy_state = WorkerPolicyState::new(CircuitBreakerConfig {
            failure_threshold: config.circuit_failure_threshold,
            open_cooldown: config.circuit_open_cooldown,
        });

        Self {
            gateway: ports.gateway,
            deals: ports.deals,
            companies: ports.companies,
            metrics: ports.metrics,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            config,
            policy_state: Mutex::new(policy_state),
        }
    }

    /// Claim one batch of pending deals and sync each against the relay.
    pub async fn run_pass(&self) -> Result<ChainSyncPassReport, Error> {
        let pending = self
            .deals
            .list_pending_sync(self.config.batch_size.max(1))
            .await
            .map_err(|err| Error::internal(format!("pending sync listing failed: {err}")))?;

        let mut report = ChainSyncPassReport {
            claimed: pending.len(),
            ..ChainSyncPassReport::default()
        };
        for deal in pending {
            match self.sync_deal(&deal).await {
                DealSyncOutcome::Confirmed => report.confirmed += 1,
                DealSyncOutcome::Failed => report.failed += 1,
                DealSyncOutcome::Deferred => report.deferred += 1,
            }
        }
        Ok(report)
    }

    /// Poll the backlog until `shutdown` observes `true`.
    pub async fn run_until_shutdown(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            match self.run_pass().await {
                Ok(report) if report.claimed > 0 => {
                    debug!(
                        claimed = report.claimed,
                        confirmed = report.confirmed,
                        failed = report.failed,
                        deferred = report.deferred,
                        "chain sync pass finished"
                    );
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "chain sync pass failed");
                }
            }
            tokio::select! {
                _ = shutdown.changed() => {}
                () = self.sleeper.sleep(self.config.poll_interval) => {}
            }
        }
    }

    async fn sync_deal(&self, deal: &DealFlow) -> DealSyncOutcome {
        let company = match self.companies.find_by_id(deal.company_id()).await {
            Ok(Some(company)) => company,
            Ok(None) => {
                // Should not happen under foreign keys; settle the deal so it
                // does not poison the backlog forever.
                let reason = format!("company '{}' no longer exists", deal.company_id());
                return self.settle_failed(deal, &reason, ChainSyncFailureKind::InternalError, 0)
                    .await;
            }
            Err(error) => {
                warn!(deal_id = %deal.id(), %error, "company lookup failed, deferring sync");
                self.record_failure_metric(ChainSyncFailureKind::InternalError, 0)
                    .await;
                return DealSyncOutcome::Deferred;
            }
        };

        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.run_single_attempt(deal, &company).await {
                Ok(tx_ref) => {
                    return self.settle_confirmed(deal, tx_ref, attempt).await;
                }
                Err(AttemptError::RetryableRelay(_error)) if attempt < max_attempts => {
                    let base_delay = self.retry_base_delay(attempt);
                    let jittered =
                        self.jitter
                            .jittered_delay(base_delay, attempt, self.clock.utc());
                    self.sleeper.sleep(jittered).await;
                }
                Err(AttemptError::RetryableRelay(error)) => {
                    let reason = format!("relay attempts exhausted: {error}");
                    return self
                        .settle_failed(deal, &reason, ChainSyncFailureKind::RetryExhausted, attempt)
                        .await;
                }
                Err(AttemptError::RelayRejected(error)) => {
                    let reason = format!("relay rejected the submission: {error}");
                    return self
                        .settle_failed(deal, &reason, ChainSyncFailureKind::RelayRejected, attempt)
                        .await;
                }
                Err(AttemptError::CircuitOpen) => {
                    debug!(deal_id = %deal.id(), "circuit open, deferring sync");
                    self.record_failure_metric(ChainSyncFailureKind::CircuitOpen, attempt)
                        .await;
                    return DealSyncOutcome::Deferred;
                }
                Err(AttemptError::StateUnavailable(message)) => {
                    warn!(deal_id = %deal.id(), message, "worker state unavailable, deferring sync");
                    self.record_failure_metric(ChainSyncFailureKind::InternalError, attempt)
                        .await;
                    return DealSyncOutcome::Deferred;
                }
            }
        }

        DealSyncOutcome::Deferred
    }

    async fn run_single_attempt(
        &self,
        deal: &DealFlow,
        company: &Company,
    ) -> Result<String, AttemptError> {
        let admission = {
            let mut state = self.policy_state.lock().map_err(|_| {
                AttemptError::StateUnavailable("worker policy state poisoned".to_owned())
            })?;
            state.admit_call(self.clock.utc())
        };
        if admission == AdmissionDecision::DeniedByCircuit {
            return Err(AttemptError::CircuitOpen);
        }

        let relay_result = self.submit_to_relay(deal, company).await;
        let mut state = self.policy_state.lock().map_err(|_| {
            AttemptError::StateUnavailable("worker policy state poisoned".to_owned())
        })?;
        match relay_result {
            Ok(tx_ref) => {
                state.record_success();
                Ok(tx_ref)
            }
            Err(error) => {
                state.record_failure(self.clock.utc());
                if error.is_retryable() {
                    Err(AttemptError::RetryableRelay(error))
                } else {
                    Err(AttemptError::RelayRejected(error))
                }
            }
        }
    }

    async fn submit_to_relay(
        &self,
        deal: &DealFlow,
        company: &Company,
    ) -> Result<String, crate::domain::ports::ChainGatewayError> {
        self.gateway
            .ensure_company(&ChainCompanySubmission {
                company_id: company.id(),
                name: company.name().to_owned(),
                stage: company.stage(),
                valuation: company.valuation(),
            })
            .await?;
        self.gateway
            .record_deal(&ChainDealSubmission {
                deal_id: deal.id(),
                company_id: deal.company_id(),
                investor_id: deal.investor_id(),
                amount: deal.investment_amount(),
            })
            .await
    }

    async fn settle_confirmed(
        &self,
        deal: &DealFlow,
        tx_ref: String,
        attempts: u32,
    ) -> DealSyncOutcome {
        let outcome = ChainSyncState::Confirmed { tx_ref };
        match self.deals.resolve_pending_sync(deal.id(), &outcome).await {
            Ok(Some(_)) => {
                self.record_success_metric(attempts).await;
                DealSyncOutcome::Confirmed
            }
            Ok(None) => {
                debug!(deal_id = %deal.id(), "deal already settled by another worker");
                DealSyncOutcome::Deferred
            }
            Err(error) => {
                warn!(deal_id = %deal.id(), %error, "confirmed outcome could not be persisted");
                self.record_failure_metric(ChainSyncFailureKind::PersistenceFailed, attempts)
                    .await;
                DealSyncOutcome::Deferred
            }
        }
    }

    async fn settle_failed(
        &self,
        deal: &DealFlow,
        reason: &str,
        kind: ChainSyncFailureKind,
        attempts: u32,
    ) -> DealSyncOutcome {
        let outcome = ChainSyncState::Failed {
            reason: reason.to_owned(),
        };
        self.record_failure_metric(kind, attempts).await;
        match self.deals.resolve_pending_sync(deal.id(), &outcome).await {
            Ok(Some(_)) => DealSyncOutcome::Failed,
            Ok(None) => {
                debug!(deal_id = %deal.id(), "deal already settled by another worker");
                DealSyncOutcome::Deferred
            }
            Err(error) => {
                warn!(deal_id = %deal.id(), %error, "failed outcome could not be persisted");
                self.record_failure_metric(ChainSyncFailureKind::PersistenceFailed, attempts)
                    .await;
                DealSyncOutcome::Deferred
            }
        }
    }

    async fn record_success_metric(&self, attempts: u32) {
        // Metrics exporter errors are deliberately non-fatal so a failed
        // counter write does not abort backlog processing.
        let _ = self
            .metrics
            .record_success(&ChainSyncSuccess {
                attempt_count: attempts,
            })
            .await;
    }

    async fn record_failure_metric(&self, kind: ChainSyncFailureKind, attempts: u32) {
        // Metrics exporter errors are deliberately non-fatal so a failed
        // counter write does not abort backlog processing.
        let _ = self
            .metrics
            .record_failure(&ChainSyncFailure {
                attempt_count: attempts,
                kind,
            })
            .await;
    }

    fn retry_base_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.config.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.config.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

#[cfg(test)]
mod tests;

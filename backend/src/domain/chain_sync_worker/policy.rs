//! Circuit breaker state machine for chain relay admission.
//!
//! Adapter-agnostic transitions between closed, open, and half-open. A run
//! of consecutive relay failures opens the breaker; after the cooldown one
//! probe call is admitted, and its outcome closes or re-opens the circuit.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Circuit breaker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures required to open the breaker.
    pub failure_threshold: u32,
    /// Cooldown period while the breaker remains open.
    pub open_cooldown: Duration,
}

/// Admission decision for one outbound relay call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Call is admitted.
    Allowed,
    /// Circuit breaker denied the call.
    DeniedByCircuit,
}

/// Circuit breaker state snapshot.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitBreakerState {
    /// Normal operation.
    Closed,
    /// Calls are blocked until cooldown elapses.
    Open,
    /// One probe call is allowed.
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CircuitInternalState {
    Closed { consecutive_failures: u32 },
    Open { opened_at: DateTime<Utc> },
    HalfOpen { probe_in_flight: bool },
}

/// Mutable breaker state shared across worker calls.
#[derive(Debug, Clone)]
pub struct WorkerPolicyState {
    config: CircuitBreakerConfig,
    state: CircuitInternalState,
}

impl WorkerPolicyState {
    /// Build breaker state with the given configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config: CircuitBreakerConfig {
                failure_threshold: config.failure_threshold.max(1),
                open_cooldown: config.open_cooldown,
            },
            state: CircuitInternalState::Closed {
                consecutive_failures: 0,
            },
        }
    }

    /// Attempt to admit one relay call.
    pub fn admit_call(&mut self, now: DateTime<Utc>) -> AdmissionDecision {
        match self.state {
            CircuitInternalState::Closed { .. } => AdmissionDecision::Allowed,
            CircuitInternalState::Open { opened_at }
                if is_cooldown_elapsed(opened_at, now, self.config.open_cooldown) =>
            {
                self.state = CircuitInternalState::HalfOpen {
                    probe_in_flight: true,
                };
                AdmissionDecision::Allowed
            }
            CircuitInternalState::Open { .. } => AdmissionDecision::DeniedByCircuit,
            CircuitInternalState::HalfOpen { probe_in_flight } => {
                if probe_in_flight {
                    AdmissionDecision::DeniedByCircuit
                } else {
                    self.state = CircuitInternalState::HalfOpen {
                        probe_in_flight: true,
                    };
                    AdmissionDecision::Allowed
                }
            }
        }
    }

    /// Record a successful relay call.
    pub fn record_success(&mut self) {
        self.state = CircuitInternalState::Closed {
            consecutive_failures: 0,
        };
    }

    /// Record a failed relay call.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.state = match self.state {
            CircuitInternalState::Closed {
                consecutive_failures,
            } => {
                let next_failures = consecutive_failures.saturating_add(1);
                if next_failures >= self.config.failure_threshold {
                    CircuitInternalState::Open { opened_at: now }
                } else {
                    CircuitInternalState::Closed {
                        consecutive_failures: next_failures,
                    }
                }
            }
            CircuitInternalState::HalfOpen { .. } => CircuitInternalState::Open { opened_at: now },
            CircuitInternalState::Open { opened_at } => CircuitInternalState::Open { opened_at },
        };
    }

    /// Snapshot current circuit breaker state.
    #[cfg(test)]
    pub fn circuit_state(&self) -> CircuitBreakerState {
        match self.state {
            CircuitInternalState::Closed { .. } => CircuitBreakerState::Closed,
            CircuitInternalState::Open { .. } => CircuitBreakerState::Open,
            CircuitInternalState::HalfOpen { .. } => CircuitBreakerState::HalfOpen,
        }
    }
}

fn is_cooldown_elapsed(opened_at: DateTime<Utc>, now: DateTime<Utc>, cooldown: Duration) -> bool {
    // Fail open when std->chrono conversion fails: this path is unlikely, and
    // returning true avoids accidentally holding the circuit open forever.
    let Ok(cooldown) = chrono::Duration::from_std(cooldown) else {
        return true;
    };

    now >= opened_at + cooldown
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0)
            .single()
            .expect("valid time")
    }

    fn state(threshold: u32, cooldown_secs: u64) -> WorkerPolicyState {
        WorkerPolicyState::new(CircuitBreakerConfig {
            failure_threshold: threshold,
            open_cooldown: Duration::from_secs(cooldown_secs),
        })
    }

    #[rstest]
    fn breaker_opens_after_the_failure_threshold() {
        let mut state = state(2, 60);
        assert_eq!(state.admit_call(now()), AdmissionDecision::Allowed);
        state.record_failure(now());
        assert_eq!(state.circuit_state(), CircuitBreakerState::Closed);
        state.record_failure(now());
        assert_eq!(state.circuit_state(), CircuitBreakerState::Open);
        assert_eq!(state.admit_call(now()), AdmissionDecision::DeniedByCircuit);
    }

    #[rstest]
    fn a_probe_is_admitted_after_the_cooldown() {
        let mut state = state(1, 60);
        state.record_failure(now());
        assert_eq!(state.admit_call(now()), AdmissionDecision::DeniedByCircuit);

        let later = now() + chrono::Duration::seconds(61);
        assert_eq!(state.admit_call(later), AdmissionDecision::Allowed);
        assert_eq!(state.circuit_state(), CircuitBreakerState::HalfOpen);
        // A second caller may not piggyback on the probe.
        assert_eq!(state.admit_call(later), AdmissionDecision::DeniedByCircuit);
    }

    #[rstest]
    fn a_successful_probe_closes_the_breaker() {
        let mut state = state(1, 60);
        state.record_failure(now());
        let later = now() + chrono::Duration::seconds(61);
        assert_eq!(state.admit_call(later), AdmissionDecision::Allowed);
        state.record_success();
        assert_eq!(state.circuit_state(), CircuitBreakerState::Closed);
        assert_eq!(state.admit_call(later), AdmissionDecision::Allowed);
    }

    #[rstest]
    fn a_failed_probe_reopens_the_breaker() {
        let mut state = state(1, 60);
        state.record_failure(now());
        let later = now() + chrono::Duration::seconds(61);
        assert_eq!(state.admit_call(later), AdmissionDecision::Allowed);
        state.record_failure(later);
        assert_eq!(state.circuit_state(), CircuitBreakerState::Open);
        assert_eq!(state.admit_call(later), AdmissionDecision::DeniedByCircuit);
    }

    #[rstest]
    fn a_success_resets_the_failure_run() {
        let mut state = state(3, 60);
        state.record_failure(now());
        state.record_failure(now());
        state.record_success();
        state.record_failure(now());
        state.record_failure(now());
        assert_eq!(state.circuit_state(), CircuitBreakerState::Closed);
    }
}

//! Attempt-local error outcomes for one chain relay call.
//!
//! These states keep retry and circuit decisions explicit inside the worker
//! loop without leaking attempt-control details into the public API.

use crate::domain::ports::ChainGatewayError;

pub(super) enum AttemptError {
    RetryableRelay(ChainGatewayError),
    RelayRejected(ChainGatewayError),
    CircuitOpen,
    StateUnavailable(String),
}

//! Chain relay outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `ChainGateway`
//! port against the relay that fronts the deployed contract.

mod dto;
mod http_relay;

pub use http_relay::{HttpChainRelay, HttpChainRelayBuildError};

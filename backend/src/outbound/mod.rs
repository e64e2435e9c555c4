//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits for various infrastructure concerns:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **chain**: reqwest-backed client for the on-chain relay service
//! - **metrics**: Prometheus-backed metrics exporters (feature-gated)
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod chain;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;

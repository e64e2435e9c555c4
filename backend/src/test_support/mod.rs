//! Shared helpers for unit tests.

pub mod chain_sync;

//! Request lifecycle middleware.
//!
//! Currently just trace-id propagation; the persona identity arrives as
//! request data rather than through a middleware layer.

pub mod trace;

pub use trace::Trace;

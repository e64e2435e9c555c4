//! Backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds entities, ports, and
//! services; `inbound` exposes the HTTP adapter; `outbound` implements the
//! driven ports (persistence, chain relay, metrics). The binary wires the
//! pieces together at startup.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

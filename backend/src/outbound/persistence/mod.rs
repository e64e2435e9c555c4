//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/mydb");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_application_repository;
mod diesel_basic_error_mapping;
mod diesel_community_repository;
mod diesel_company_repository;
mod diesel_deal_flow_repository;
mod diesel_idea_validation_repository;
mod diesel_idempotency_repository;
mod diesel_job_posting_repository;
mod diesel_profile_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_community_repository::DieselCommunityRepository;
pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_deal_flow_repository::DieselDealFlowRepository;
pub use diesel_idea_validation_repository::DieselIdeaValidationRepository;
pub use diesel_idempotency_repository::DieselIdempotencyRepository;
pub use diesel_job_posting_repository::DieselJobPostingRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

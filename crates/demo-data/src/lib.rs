//! Deterministic demo persona and company generation for demonstration
//! purposes.
//!
//! This crate produces a believable, reproducible cohort of founders,
//! investors, and jobseekers, together with their companies, job postings,
//! and community posts, from a numeric seed. It is designed to be
//! independent of backend domain types to avoid circular dependencies.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Deterministic cohort generation from a [`CohortConfig`]
//! - Persona name and company name validation matching backend constraints
//! - Stable civic identifiers so repeated seeding is idempotent
//!
//! # Example
//!
//! ```
//! use demo_data::{CohortConfig, generate_demo_cohort};
//!
//! let config = CohortConfig::default();
//! let cohort = generate_demo_cohort(&config).expect("generation succeeds");
//!
//! assert_eq!(cohort.founders.len(), config.founder_count);
//! // Same config produces identical output.
//! let again = generate_demo_cohort(&config).expect("generation succeeds");
//! assert_eq!(cohort, again);
//! ```

mod error;
mod generator;
mod seed;
mod validation;

pub use error::GenerationError;
pub use generator::{CohortConfig, generate_demo_cohort};
pub use seed::{
    DemoCohort, DemoCompanySeed, DemoFounderSeed, DemoInvestorSeed, DemoJobseekerSeed,
    DemoPostSeed, DemoPostingSeed, ExperienceLevelSeed, FundingStageSeed,
};
pub use validation::{PERSONA_NAME_MAX, PERSONA_NAME_MIN, is_valid_persona_name};

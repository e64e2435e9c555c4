//! Error types for the demo-data crate.
//!
//! This module defines semantic error enums for cohort generation, following
//! the project's error handling conventions with `thiserror`.

use thiserror::Error;

/// Errors that can occur during cohort generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Persona name generation exhausted its retry budget without producing
    /// a valid name.
    #[error("failed to generate a valid persona name after {max_attempts} attempts")]
    PersonaNameGenerationFailed {
        /// Maximum number of attempts that were made.
        max_attempts: usize,
    },

    /// The configuration requested posts but no personas to author them.
    #[error("cannot generate {post_count} posts with an empty cohort")]
    NoAuthorsForPosts {
        /// Number of posts requested.
        post_count: usize,
    },
}

//! Role-specific profile entities.
//!
//! Each platform role carries one profile keyed by the owning user's id.
//! Profiles are validated domain entities; the database stores what these
//! constructors accept.

use std::fmt;

use crate::domain::company::FundingStage;

mod founder;
mod investor;
mod jobseeker;
mod validation;


pub use founder::{FounderProfile, FounderProfileDraft};
pub use investor::{InvestorProfile, InvestorProfileDraft};
pub use jobseeker::{
    ExperienceLevel, JobseekerProfile, JobseekerProfileDraft, ParseExperienceLevelError,
};

/// Validation errors returned by profile constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyField {
        field: &'static str,
    },
    FieldTooLong {
        field: &'static str,
        max: usize,
    },
    BlankEntry {
        field: &'static str,
    },
    NegativeCount {
        field: &'static str,
        value: i32,
    },
    NegativeCheckSize {
        value: i64,
    },
    CheckSizeOutOfOrder {
        min: i64,
        max: i64,
    },
    DuplicateStage {
        stage: FundingStage,
    },
    InvalidUrl {
        field: &'static str,
    },
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::BlankEntry { field } => {
                write!(f, "{field} must not contain blank entries")
            }
            Self::NegativeCount { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            Self::NegativeCheckSize { value } => {
                write!(f, "check sizes must not be negative (got {value})")
            }
            Self::CheckSizeOutOfOrder { min, max } => {
                write!(f, "check size minimum {min} exceeds maximum {max}")
            }
            Self::DuplicateStage { stage } => {
                write!(f, "preferred stage '{stage}' is listed more than once")
            }
            Self::InvalidUrl { field } => write!(f, "{field} must be a valid URL"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

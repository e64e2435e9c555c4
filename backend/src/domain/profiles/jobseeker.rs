//! Jobseeker profile entity and experience level vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ProfileValidationError;
use super::validation::{validate_entries, validate_optional_url};

/// Seniority band of a jobseeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    /// All experience level variants in ascending seniority order.
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Junior,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
    ];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid experience level string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExperienceLevelError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseExperienceLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<_> = ExperienceLevel::ALL.iter().map(|v| v.as_str()).collect();
        write!(
            f,
            "invalid experience level '{}': expected one of {}",
            self.input,
            variants.join(", ")
        )
    }
}

impl std::error::Error for ParseExperienceLevelError {}

impl FromStr for ExperienceLevel {
    type Err = ParseExperienceLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseExperienceLevelError {
                input: s.to_owned(),
            })
    }
}

/// Input payload for [`JobseekerProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct JobseekerProfileDraft {
    pub user_id: Uuid,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

/// Jobseeker-role profile belonging to one user.
///
/// ## Invariants
/// - `skills` entries are non-blank.
/// - `resume_url` and `portfolio_url`, when present, parse as URLs. The
///   targets stay opaque; media storage is an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct JobseekerProfile {
    user_id: Uuid,
    skills: Vec<String>,
    experience_level: ExperienceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    portfolio_url: Option<String>,
}

impl JobseekerProfile {
    /// Validate and construct a jobseeker profile.
    pub fn new(draft: JobseekerProfileDraft) -> Result<Self, ProfileValidationError> {
        Self::try_from(draft)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
    pub fn skills(&self) -> &[String] {
        self.skills.as_slice()
    }
    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }
    pub fn resume_url(&self) -> Option<&str> {
        self.resume_url.as_deref()
    }
    pub fn portfolio_url(&self) -> Option<&str> {
        self.portfolio_url.as_deref()
    }
}

impl TryFrom<JobseekerProfileDraft> for JobseekerProfile {
    type Error = ProfileValidationError;

    fn try_from(draft: JobseekerProfileDraft) -> Result<Self, Self::Error> {
        let skills = validate_entries(draft.skills, "jobseekerProfile.skills")?;
        let resume_url = validate_optional_url(draft.resume_url, "jobseekerProfile.resumeUrl")?;
        let portfolio_url =
            validate_optional_url(draft.portfolio_url, "jobseekerProfile.portfolioUrl")?;

        Ok(Self {
            user_id: draft.user_id,
            skills,
            experience_level: draft.experience_level,
            resume_url,
            portfolio_url,
        })
    }
}

impl<'de> Deserialize<'de> for JobseekerProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        JobseekerProfileDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

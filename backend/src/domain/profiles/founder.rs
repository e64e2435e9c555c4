//! Founder profile entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ProfileValidationError;
use super::validation::{validate_entries, validate_optional_text};

/// Maximum allowed length for a founder biography.
pub const BIO_MAX: usize = 2_000;

/// Input payload for [`FounderProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct FounderProfileDraft {
    pub user_id: Uuid,
    #[serde(default)]
    pub company_count: i32,
    #[serde(default)]
    pub cofounders: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Founder-role profile belonging to one user.
///
/// ## Invariants
/// - `company_count` is non-negative.
/// - `cofounders` and `achievements` entries are non-blank.
/// - `bio`, when present, is non-blank and within [`BIO_MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct FounderProfile {
    user_id: Uuid,
    company_count: i32,
    cofounders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    achievements: Vec<String>,
}

impl FounderProfile {
    /// Validate and construct a founder profile.
    pub fn new(draft: FounderProfileDraft) -> Result<Self, ProfileValidationError> {
        Self::try_from(draft)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
    pub fn company_count(&self) -> i32 {
        self.company_count
    }
    pub fn cofounders(&self) -> &[String] {
        self.cofounders.as_slice()
    }
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
    pub fn achievements(&self) -> &[String] {
        self.achievements.as_slice()
    }

    /// Return a copy with the company count replaced.
    pub fn with_company_count(mut self, company_count: i32) -> Self {
        self.company_count = company_count.max(0);
        self
    }
}

impl TryFrom<FounderProfileDraft> for FounderProfile {
    type Error = ProfileValidationError;

    fn try_from(draft: FounderProfileDraft) -> Result<Self, Self::Error> {
        if draft.company_count < 0 {
            return Err(ProfileValidationError::NegativeCount {
                field: "founderProfile.companyCount",
                value: draft.company_count,
            });
        }
        let cofounders = validate_entries(draft.cofounders, "founderProfile.cofounders")?;
        let bio = validate_optional_text(draft.bio, "founderProfile.bio", BIO_MAX)?;
        let achievements = validate_entries(draft.achievements, "founderProfile.achievements")?;

        Ok(Self {
            user_id: draft.user_id,
            company_count: draft.company_count,
            cofounders,
            bio,
            achievements,
        })
    }
}

impl<'de> Deserialize<'de> for FounderProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        FounderProfileDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

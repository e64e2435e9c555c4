//! Investor profile entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ProfileValidationError;
use super::validation::{validate_entries, validate_required_text};
use crate::domain::company::FundingStage;

/// Maximum allowed length for an investment firm name.
pub const FIRM_NAME_MAX: usize = 120;

/// Input payload for [`InvestorProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct InvestorProfileDraft {
    pub user_id: Uuid,
    pub firm_name: String,
    pub check_size_min: i64,
    pub check_size_max: i64,
    #[serde(default)]
    pub preferred_stages: Vec<FundingStage>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
}

/// Investor-role profile belonging to one user.
///
/// ## Invariants
/// - `firm_name` is non-blank within [`FIRM_NAME_MAX`].
/// - `0 <= check_size_min <= check_size_max`.
/// - `preferred_stages` contains no duplicate stage.
/// - `preferred_industries` entries are non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct InvestorProfile {
    user_id: Uuid,
    firm_name: String,
    check_size_min: i64,
    check_size_max: i64,
    preferred_stages: Vec<FundingStage>,
    preferred_industries: Vec<String>,
}

impl InvestorProfile {
    /// Validate and construct an investor profile.
    pub fn new(draft: InvestorProfileDraft) -> Result<Self, ProfileValidationError> {
        Self::try_from(draft)
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
    pub fn firm_name(&self) -> &str {
        self.firm_name.as_str()
    }
    pub fn check_size_min(&self) -> i64 {
        self.check_size_min
    }
    pub fn check_size_max(&self) -> i64 {
        self.check_size_max
    }
    pub fn preferred_stages(&self) -> &[FundingStage] {
        self.preferred_stages.as_slice()
    }
    pub fn preferred_industries(&self) -> &[String] {
        self.preferred_industries.as_slice()
    }
}

impl TryFrom<InvestorProfileDraft> for InvestorProfile {
    type Error = ProfileValidationError;

    fn try_from(draft: InvestorProfileDraft) -> Result<Self, Self::Error> {
        let firm_name =
            validate_required_text(draft.firm_name, "investorProfile.firmName", FIRM_NAME_MAX)?;
        if draft.check_size_min < 0 {
            return Err(ProfileValidationError::NegativeCheckSize {
                value: draft.check_size_min,
            });
        }
        if draft.check_size_max < 0 {
            return Err(ProfileValidationError::NegativeCheckSize {
                value: draft.check_size_max,
            });
        }
        if draft.check_size_min > draft.check_size_max {
            return Err(ProfileValidationError::CheckSizeOutOfOrder {
                min: draft.check_size_min,
                max: draft.check_size_max,
            });
        }
        if let Some(stage) = first_duplicate_stage(&draft.preferred_stages) {
            return Err(ProfileValidationError::DuplicateStage { stage });
        }
        let preferred_industries = validate_entries(
            draft.preferred_industries,
            "investorProfile.preferredIndustries",
        )?;

        Ok(Self {
            user_id: draft.user_id,
            firm_name,
            check_size_min: draft.check_size_min,
            check_size_max: draft.check_size_max,
            preferred_stages: draft.preferred_stages,
            preferred_industries,
        })
    }
}

impl<'de> Deserialize<'de> for InvestorProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        InvestorProfileDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

fn first_duplicate_stage(stages: &[FundingStage]) -> Option<FundingStage> {
    stages
        .iter()
        .enumerate()
        .find(|(index, stage)| stages[..*index].contains(stage))
        .map(|(_, stage)| *stage)
}

//! Company entity and funding stage vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum allowed length for a company name.
pub const COMPANY_NAME_MAX: usize = 120;
/// Maximum allowed length for an industry label.
pub const INDUSTRY_MAX: usize = 80;

/// Validation errors returned by [`Company::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    EmptyField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
    NegativeValuation { valuation: i64 },
}

impl fmt::Display for CompanyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::NegativeValuation { valuation } => {
                write!(f, "valuation must not be negative (got {valuation})")
            }
        }
    }
}

impl std::error::Error for CompanyValidationError {}

/// Funding stage of a company, also used for investor stage preferences.
///
/// # Example
///
/// ```
/// use backend::domain::FundingStage;
///
/// assert_eq!(FundingStage::SeriesA.as_str(), "series-a");
/// assert_eq!("growth".parse::<FundingStage>(), Ok(FundingStage::Growth));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    Growth,
}

impl FundingStage {
    /// All funding stage variants in ascending maturity order.
    pub const ALL: [FundingStage; 5] = [
        FundingStage::PreSeed,
        FundingStage::Seed,
        FundingStage::SeriesA,
        FundingStage::SeriesB,
        FundingStage::Growth,
    ];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreSeed => "pre-seed",
            Self::Seed => "seed",
            Self::SeriesA => "series-a",
            Self::SeriesB => "series-b",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid funding stage string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFundingStageError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseFundingStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<_> = FundingStage::ALL.iter().map(|v| v.as_str()).collect();
        write!(
            f,
            "invalid funding stage '{}': expected one of {}",
            self.input,
            variants.join(", ")
        )
    }
}

impl std::error::Error for ParseFundingStageError {}

impl FromStr for FundingStage {
    type Err = ParseFundingStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseFundingStageError {
                input: s.to_owned(),
            })
    }
}

/// Input payload for [`Company::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CompanyDraft {
    pub id: Uuid,
    pub founder_id: Uuid,
    pub name: String,
    pub industry: String,
    pub stage: FundingStage,
    pub valuation: i64,
}

/// Company founded by a platform user.
///
/// ## Invariants
/// - `name` and `industry` are non-blank within their length bounds.
/// - `valuation` is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Company {
    id: Uuid,
    founder_id: Uuid,
    name: String,
    industry: String,
    stage: FundingStage,
    valuation: i64,
}

impl Company {
    /// Validate and construct a company.
    pub fn new(draft: CompanyDraft) -> Result<Self, CompanyValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn founder_id(&self) -> Uuid {
        self.founder_id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn industry(&self) -> &str {
        self.industry.as_str()
    }
    pub fn stage(&self) -> FundingStage {
        self.stage
    }
    pub fn valuation(&self) -> i64 {
        self.valuation
    }
}

impl TryFrom<CompanyDraft> for Company {
    type Error = CompanyValidationError;

    fn try_from(draft: CompanyDraft) -> Result<Self, Self::Error> {
        let name = validate_bounded_text(draft.name, "company.name", COMPANY_NAME_MAX)?;
        let industry = validate_bounded_text(draft.industry, "company.industry", INDUSTRY_MAX)?;
        if draft.valuation < 0 {
            return Err(CompanyValidationError::NegativeValuation {
                valuation: draft.valuation,
            });
        }

        Ok(Self {
            id: draft.id,
            founder_id: draft.founder_id,
            name,
            industry,
            stage: draft.stage,
            valuation: draft.valuation,
        })
    }
}

impl<'de> Deserialize<'de> for Company {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        CompanyDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

pub(crate) fn validate_bounded_text(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, CompanyValidationError> {
    if value.trim().is_empty() {
        return Err(CompanyValidationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(CompanyValidationError::FieldTooLong { field, max });
    }
    Ok(value)
}

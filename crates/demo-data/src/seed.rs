//! Generated persona and company seed types.
//!
//! This module defines the output types from cohort generation. These types
//! are independent of backend domain types to avoid circular dependencies;
//! the backend converts them into its own entities at the point of use.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Funding stage for a generated company or investor preference.
///
/// Mirrors the backend's `FundingStage` enum without creating a dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStageSeed {
    /// Pre-seed stage.
    #[default]
    PreSeed,
    /// Seed stage.
    Seed,
    /// Series A.
    SeriesA,
    /// Series B.
    SeriesB,
    /// Growth stage.
    Growth,
}

impl FundingStageSeed {
    /// All stages in ascending maturity order.
    pub const ALL: [Self; 5] = [
        Self::PreSeed,
        Self::Seed,
        Self::SeriesA,
        Self::SeriesB,
        Self::Growth,
    ];
}

/// Experience level for a generated jobseeker.
///
/// Mirrors the backend's `ExperienceLevel` enum without creating a
/// dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevelSeed {
    /// Early-career.
    #[default]
    Junior,
    /// Mid-level.
    Mid,
    /// Senior individual contributor.
    Senior,
    /// Team or function lead.
    Lead,
}

impl ExperienceLevelSeed {
    /// All levels in ascending seniority order.
    pub const ALL: [Self; 4] = [Self::Junior, Self::Mid, Self::Senior, Self::Lead];
}

/// A generated company record owned by a founder persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoCompanySeed {
    /// Unique identifier for the company.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Industry label drawn from the generator's catalogue.
    pub industry: String,
    /// Funding stage.
    pub stage: FundingStageSeed,
    /// Valuation in whole dollars, consistent with the stage.
    pub valuation: i64,
    /// Job postings attached to the company.
    pub postings: Vec<DemoPostingSeed>,
}

/// A generated job posting attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPostingSeed {
    /// Unique identifier for the posting.
    pub id: Uuid,
    /// Role title.
    pub title: String,
    /// Required skills drawn from the generator's catalogue.
    pub skills_required: Vec<String>,
}

/// A generated founder persona with companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFounderSeed {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Stable external identity, e.g. `demo-founder-01`.
    pub civic_id: String,
    /// Contact email derived from the persona name.
    pub email: String,
    /// Persona display name.
    pub name: String,
    /// Short biography.
    pub bio: String,
    /// Achievement blurbs.
    pub achievements: Vec<String>,
    /// Companies founded by this persona.
    pub companies: Vec<DemoCompanySeed>,
}

/// A generated investor persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoInvestorSeed {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Stable external identity, e.g. `demo-investor-01`.
    pub civic_id: String,
    /// Contact email derived from the persona name.
    pub email: String,
    /// Persona display name.
    pub name: String,
    /// Investment firm name.
    pub firm_name: String,
    /// Minimum check size in whole dollars.
    pub check_size_min: i64,
    /// Maximum check size in whole dollars; always >= the minimum.
    pub check_size_max: i64,
    /// Preferred funding stages.
    pub preferred_stages: Vec<FundingStageSeed>,
    /// Preferred industries drawn from the generator's catalogue.
    pub preferred_industries: Vec<String>,
}

/// A generated jobseeker persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoJobseekerSeed {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Stable external identity, e.g. `demo-jobseeker-01`.
    pub civic_id: String,
    /// Contact email derived from the persona name.
    pub email: String,
    /// Persona display name.
    pub name: String,
    /// Skills drawn from the generator's catalogue.
    pub skills: Vec<String>,
    /// Experience level.
    pub experience_level: ExperienceLevelSeed,
}

/// A generated community post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPostSeed {
    /// Unique identifier for the post.
    pub id: Uuid,
    /// Author user identifier; always one of the cohort's personas.
    pub author_id: Uuid,
    /// Post body.
    pub content: String,
}

/// A complete generated cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoCohort {
    /// Founder personas with their companies and postings.
    pub founders: Vec<DemoFounderSeed>,
    /// Investor personas.
    pub investors: Vec<DemoInvestorSeed>,
    /// Jobseeker personas.
    pub jobseekers: Vec<DemoJobseekerSeed>,
    /// Community posts authored by cohort personas.
    pub posts: Vec<DemoPostSeed>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funding_stage_seed_serializes_kebab_case() {
        let stage = serde_json::to_string(&FundingStageSeed::SeriesA).expect("serialize");
        assert_eq!(stage, "\"series-a\"");
    }

    #[test]
    fn experience_level_seed_serializes_lowercase() {
        let level = serde_json::to_string(&ExperienceLevelSeed::Senior).expect("serialize");
        assert_eq!(level, "\"senior\"");
    }

    #[test]
    fn founder_seed_serializes_to_camel_case() {
        let founder = DemoFounderSeed {
            id: Uuid::nil(),
            civic_id: "demo-founder-01".to_owned(),
            email: "test@example.io".to_owned(),
            name: "Test Founder".to_owned(),
            bio: "Builds things".to_owned(),
            achievements: vec![],
            companies: vec![],
        };
        let json = serde_json::to_string(&founder).expect("serialize");
        assert!(json.contains("civicId"));
        assert!(json.contains("achievements"));
        assert!(json.contains("companies"));
    }

    #[test]
    fn investor_seed_serializes_check_sizes_in_camel_case() {
        let investor = DemoInvestorSeed {
            id: Uuid::nil(),
            civic_id: "demo-investor-01".to_owned(),
            email: "test@example.io".to_owned(),
            name: "Test Investor".to_owned(),
            firm_name: "Test Capital".to_owned(),
            check_size_min: 50_000,
            check_size_max: 250_000,
            preferred_stages: vec![FundingStageSeed::Seed],
            preferred_industries: vec!["fintech".to_owned()],
        };
        let json = serde_json::to_string(&investor).expect("serialize");
        assert!(json.contains("checkSizeMin"));
        assert!(json.contains("checkSizeMax"));
        assert!(json.contains("preferredStages"));
    }
}

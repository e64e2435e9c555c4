//! Idea validation entity and deterministic scoring heuristic.
//!
//! Submitted idea text is scored server-side by a total, deterministic
//! heuristic so the operation needs no external scorer: equal text always
//! produces an equal score.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum allowed length for submitted idea text.
pub const IDEA_TEXT_MAX: usize = 4_000;

/// Validation errors returned by [`IdeaValidation::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaValidationError {
    EmptyIdeaText,
    IdeaTextTooLong { max: usize },
    ScoreOutOfRange { score: i32 },
}

impl fmt::Display for IdeaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdeaText => write!(f, "idea text must not be empty"),
            Self::IdeaTextTooLong { max } => {
                write!(f, "idea text must be at most {max} characters")
            }
            Self::ScoreOutOfRange { score } => {
                write!(f, "score must be within 0..=100 (got {score})")
            }
        }
    }
}

impl std::error::Error for IdeaValidationError {}

/// Input payload for [`IdeaValidation::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct IdeaValidationDraft {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub company_id: Option<Uuid>,
    pub idea_text: String,
    pub score: i32,
    pub validation_result: String,
}

/// Scored assessment of a founder's idea text.
///
/// ## Invariants
/// - `idea_text` is non-blank within [`IDEA_TEXT_MAX`].
/// - `score` lies within `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct IdeaValidation {
    id: Uuid,
    user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_id: Option<Uuid>,
    idea_text: String,
    score: i32,
    validation_result: String,
}

impl IdeaValidation {
    /// Validate and construct an idea validation from stored values.
    pub fn new(draft: IdeaValidationDraft) -> Result<Self, IdeaValidationError> {
        Self::try_from(draft)
    }

    /// Score fresh idea text and construct the assessment for it.
    pub fn assess(
        id: Uuid,
        user_id: Uuid,
        company_id: Option<Uuid>,
        idea_text: String,
    ) -> Result<Self, IdeaValidationError> {
        let idea_text = validate_idea_text(idea_text)?;
        let score = score_idea_text(&idea_text);
        Ok(Self {
            id,
            user_id,
            company_id,
            idea_text,
            score,
            validation_result: score_band(score).to_owned(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
    pub fn company_id(&self) -> Option<Uuid> {
        self.company_id
    }
    pub fn idea_text(&self) -> &str {
        self.idea_text.as_str()
    }
    pub fn score(&self) -> i32 {
        self.score
    }
    pub fn validation_result(&self) -> &str {
        self.validation_result.as_str()
    }
}

impl TryFrom<IdeaValidationDraft> for IdeaValidation {
    type Error = IdeaValidationError;

    fn try_from(draft: IdeaValidationDraft) -> Result<Self, Self::Error> {
        let idea_text = validate_idea_text(draft.idea_text)?;
        if !(0..=100).contains(&draft.score) {
            return Err(IdeaValidationError::ScoreOutOfRange { score: draft.score });
        }

        Ok(Self {
            id: draft.id,
            user_id: draft.user_id,
            company_id: draft.company_id,
            idea_text,
            score: draft.score,
            validation_result: draft.validation_result,
        })
    }
}

impl<'de> Deserialize<'de> for IdeaValidation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        IdeaValidationDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

fn validate_idea_text(text: String) -> Result<String, IdeaValidationError> {
    if text.trim().is_empty() {
        return Err(IdeaValidationError::EmptyIdeaText);
    }
    if text.chars().count() > IDEA_TEXT_MAX {
        return Err(IdeaValidationError::IdeaTextTooLong { max: IDEA_TEXT_MAX });
    }
    Ok(text)
}

/// Business-concern keywords the scorer rewards coverage of.
const SCORING_KEYWORDS: [&str; 10] = [
    "problem",
    "market",
    "customer",
    "revenue",
    "team",
    "growth",
    "competitor",
    "traction",
    "pricing",
    "moat",
];

/// Score idea text deterministically into `0..=100`.
///
/// The heuristic rewards elaboration (word count), coverage of business
/// concerns ([`SCORING_KEYWORDS`]), multi-sentence structure, and concrete
/// figures. Scores are clamped to `0..=100`.
///
/// # Examples
///
/// ```
/// use backend::domain::score_idea_text;
///
/// let text = "A tool for teams.";
/// assert_eq!(score_idea_text(text), score_idea_text(text));
/// assert!((0..=100).contains(&score_idea_text(text)));
/// ```
pub fn score_idea_text(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    let word_count = lowered.split_whitespace().count();

    let mut score: i32 = 20;

    if word_count >= 30 {
        score += 15;
    }
    if word_count >= 80 {
        score += 10;
    }

    let keyword_hits = SCORING_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(**keyword))
        .count();
    let keyword_hits = i32::try_from(keyword_hits).unwrap_or(i32::MAX);
    score += keyword_hits.saturating_mul(5).min(40);

    if lowered.matches(['.', '!', '?']).count() >= 3 {
        score += 10;
    }
    if lowered.chars().any(|c| c.is_ascii_digit()) {
        score += 5;
    }

    score.clamp(0, 100)
}

/// One-line verdict band for a score.
pub fn score_band(score: i32) -> &'static str {
    match score {
        s if s >= 70 => "strong potential",
        s if s >= 40 => "promising direction",
        _ => "needs refinement",
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    const ELABORATE_IDEA: &str = "We solve a scheduling problem for field service teams. \
        The market is large and underserved; every customer we interviewed loses revenue \
        to missed appointments. Our team has shipped scheduling software before. Early \
        traction: 12 pilot customers, clear pricing, and growth of 20 percent month over \
        month against every competitor we have tracked.";

    #[rstest]
    fn scoring_is_deterministic() {
        assert_eq!(
            score_idea_text(ELABORATE_IDEA),
            score_idea_text(ELABORATE_IDEA)
        );
    }

    #[rstest]
    #[case("An app.")]
    #[case(ELABORATE_IDEA)]
    fn scores_stay_within_range(#[case] text: &str) {
        let score = score_idea_text(text);
        assert!((0..=100).contains(&score), "score {score} out of range");
    }

    #[rstest]
    fn elaborate_ideas_outscore_bare_ones() {
        assert!(score_idea_text(ELABORATE_IDEA) > score_idea_text("An app for things."));
    }

    #[rstest]
    #[case(85, "strong potential")]
    #[case(55, "promising direction")]
    #[case(20, "needs refinement")]
    fn bands_follow_score(#[case] score: i32, #[case] expected: &str) {
        assert_eq!(score_band(score), expected);
    }

    #[rstest]
    fn assess_records_band_and_score() {
        let assessment = IdeaValidation::assess(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            ELABORATE_IDEA.to_owned(),
        )
        .expect("valid idea text");
        assert_eq!(assessment.score(), score_idea_text(ELABORATE_IDEA));
        assert_eq!(
            assessment.validation_result(),
            score_band(assessment.score())
        );
    }

    #[rstest]
    fn assess_rejects_blank_text() {
        let result = IdeaValidation::assess(Uuid::new_v4(), Uuid::new_v4(), None, "  ".to_owned());
        assert_eq!(result, Err(IdeaValidationError::EmptyIdeaText));
    }

    #[rstest]
    fn stored_scores_outside_range_are_rejected() {
        let draft = IdeaValidationDraft {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_id: None,
            idea_text: "A tool.".to_owned(),
            score: 101,
            validation_result: "strong potential".to_owned(),
        };
        assert_eq!(
            IdeaValidation::new(draft),
            Err(IdeaValidationError::ScoreOutOfRange { score: 101 })
        );
    }
}

//! Job posting and application entities, including the application status
//! state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum allowed length for a job posting title.
pub const JOB_TITLE_MAX: usize = 160;
/// Maximum allowed length for an application cover letter.
pub const COVER_LETTER_MAX: usize = 4_000;

/// Validation errors returned by job posting and application constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    EmptyField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
    BlankEntry { field: &'static str },
}

impl fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::BlankEntry { field } => {
                write!(f, "{field} must not contain blank entries")
            }
        }
    }
}

impl std::error::Error for JobValidationError {}

/// Lifecycle status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    /// Accepting applications.
    Open,
    /// No longer accepting applications.
    Closed,
}

impl PostingStatus {
    /// All posting status variants.
    pub const ALL: [PostingStatus; 2] = [PostingStatus::Open, PostingStatus::Closed];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseStatusError {
                input: s.to_owned(),
                expected: "open, closed",
            })
    }
}

/// Review status of a job application.
///
/// Transitions follow a fixed set; [`ApplicationStatus::can_transition_to`]
/// is the single source of truth consulted before any status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, awaiting review.
    Applied,
    /// Progressed to interviews.
    Interview,
    /// Offer made and accepted; terminal.
    Accepted,
    /// Turned down; terminal.
    Rejected,
    /// Parked for a later decision.
    Waitlist,
}

impl ApplicationStatus {
    /// All application status variants.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Waitlist,
    ];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interview => "interview",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Waitlist => "waitlist",
        }
    }

    /// Statuses this status may move to.
    ///
    /// # Example
    ///
    /// ```
    /// use backend::domain::ApplicationStatus;
    ///
    /// assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Interview));
    /// assert!(!ApplicationStatus::Accepted.can_transition_to(ApplicationStatus::Rejected));
    /// ```
    pub fn allowed_transitions(&self) -> &'static [ApplicationStatus] {
        match self {
            Self::Applied => &[Self::Interview, Self::Rejected, Self::Waitlist],
            Self::Interview => &[Self::Accepted, Self::Rejected, Self::Waitlist],
            Self::Waitlist => &[Self::Interview, Self::Accepted, Self::Rejected],
            Self::Accepted | Self::Rejected => &[],
        }
    }

    /// Whether moving to `next` is an allowed transition.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseStatusError {
                input: s.to_owned(),
                expected: "applied, interview, accepted, rejected, waitlist",
            })
    }
}

/// Error returned when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    /// The invalid input string.
    pub input: String,
    /// Comma-separated accepted values.
    pub expected: &'static str,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid status '{}': expected one of {}",
            self.input, self.expected
        )
    }
}

impl std::error::Error for ParseStatusError {}

/// Input payload for [`JobPosting::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct JobPostingDraft {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub status: PostingStatus,
}

/// Role advertised by a company.
///
/// ## Invariants
/// - `title` is non-blank within [`JOB_TITLE_MAX`].
/// - `skills_required` entries are non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct JobPosting {
    id: Uuid,
    company_id: Uuid,
    title: String,
    skills_required: Vec<String>,
    status: PostingStatus,
}

impl JobPosting {
    /// Validate and construct a job posting.
    pub fn new(draft: JobPostingDraft) -> Result<Self, JobValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn company_id(&self) -> Uuid {
        self.company_id
    }
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
    pub fn skills_required(&self) -> &[String] {
        self.skills_required.as_slice()
    }
    pub fn status(&self) -> PostingStatus {
        self.status
    }
}

impl TryFrom<JobPostingDraft> for JobPosting {
    type Error = JobValidationError;

    fn try_from(draft: JobPostingDraft) -> Result<Self, Self::Error> {
        if draft.title.trim().is_empty() {
            return Err(JobValidationError::EmptyField {
                field: "jobPosting.title",
            });
        }
        if draft.title.chars().count() > JOB_TITLE_MAX {
            return Err(JobValidationError::FieldTooLong {
                field: "jobPosting.title",
                max: JOB_TITLE_MAX,
            });
        }
        if draft.skills_required.iter().any(|s| s.trim().is_empty()) {
            return Err(JobValidationError::BlankEntry {
                field: "jobPosting.skillsRequired",
            });
        }

        Ok(Self {
            id: draft.id,
            company_id: draft.company_id,
            title: draft.title,
            skills_required: draft.skills_required,
            status: draft.status,
        })
    }
}

impl<'de> Deserialize<'de> for JobPosting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        JobPostingDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Input payload for [`Application::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ApplicationDraft {
    pub id: Uuid,
    pub job_posting_id: Uuid,
    pub jobseeker_id: Uuid,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// A jobseeker's application to one posting.
///
/// ## Invariants
/// - `cover_letter`, when present, is non-blank within [`COVER_LETTER_MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Application {
    id: Uuid,
    job_posting_id: Uuid,
    jobseeker_id: Uuid,
    status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_letter: Option<String>,
}

impl Application {
    /// Validate and construct an application.
    pub fn new(draft: ApplicationDraft) -> Result<Self, JobValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn job_posting_id(&self) -> Uuid {
        self.job_posting_id
    }
    pub fn jobseeker_id(&self) -> Uuid {
        self.jobseeker_id
    }
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }
    pub fn cover_letter(&self) -> Option<&str> {
        self.cover_letter.as_deref()
    }

    /// Return a copy carrying the new status.
    ///
    /// Callers check [`ApplicationStatus::can_transition_to`] first; this
    /// method does not re-validate the transition.
    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }
}

impl TryFrom<ApplicationDraft> for Application {
    type Error = JobValidationError;

    fn try_from(draft: ApplicationDraft) -> Result<Self, Self::Error> {
        if let Some(letter) = draft.cover_letter.as_deref() {
            if letter.trim().is_empty() {
                return Err(JobValidationError::EmptyField {
                    field: "application.coverLetter",
                });
            }
            if letter.chars().count() > COVER_LETTER_MAX {
                return Err(JobValidationError::FieldTooLong {
                    field: "application.coverLetter",
                    max: COVER_LETTER_MAX,
                });
            }
        }

        Ok(Self {
            id: draft.id,
            job_posting_id: draft.job_posting_id,
            jobseeker_id: draft.jobseeker_id,
            status: draft.status,
            cover_letter: draft.cover_letter,
        })
    }
}

impl<'de> Deserialize<'de> for Application {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ApplicationDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

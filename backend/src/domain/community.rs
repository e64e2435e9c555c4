//! Community post entity with per-user like state.
//!
//! Likes are set membership, not a bare counter: toggling twice by the same
//! user returns the post to its original count.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum allowed length for post content.
pub const POST_CONTENT_MAX: usize = 2_000;

/// Validation errors returned by [`CommunityPost::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunityValidationError {
    EmptyContent,
    ContentTooLong { max: usize },
    DuplicateLike { user_id: Uuid },
}

impl fmt::Display for CommunityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "post content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "post content must be at most {max} characters")
            }
            Self::DuplicateLike { user_id } => {
                write!(f, "user {user_id} appears more than once in liked-by")
            }
        }
    }
}

impl std::error::Error for CommunityValidationError {}

/// Post shared on the community feed.
///
/// ## Invariants
/// - `content` is non-blank within [`POST_CONTENT_MAX`].
/// - `liked_by` contains each user at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CommunityPostDto", into = "CommunityPostDto")]
pub struct CommunityPost {
    id: Uuid,
    author_id: Uuid,
    content: String,
    liked_by: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl CommunityPost {
    /// Validate and construct a post from stored values.
    pub fn new(
        id: Uuid,
        author_id: Uuid,
        content: String,
        liked_by: Vec<Uuid>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommunityValidationError> {
        if content.trim().is_empty() {
            return Err(CommunityValidationError::EmptyContent);
        }
        if content.chars().count() > POST_CONTENT_MAX {
            return Err(CommunityValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        if let Some(user_id) = first_duplicate(&liked_by) {
            return Err(CommunityValidationError::DuplicateLike { user_id });
        }

        Ok(Self {
            id,
            author_id,
            content,
            liked_by,
            created_at,
        })
    }

    /// Construct a fresh, unliked post.
    pub fn compose(
        id: Uuid,
        author_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommunityValidationError> {
        Self::new(id, author_id, content, Vec::new(), created_at)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn author_id(&self) -> Uuid {
        self.author_id
    }
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
    pub fn liked_by(&self) -> &[Uuid] {
        self.liked_by.as_slice()
    }
    pub fn like_count(&self) -> usize {
        self.liked_by.len()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the given user currently likes this post.
    pub fn liked_by_user(&self, user_id: Uuid) -> bool {
        self.liked_by.contains(&user_id)
    }

    /// Flip the like state for one user.
    ///
    /// Returns `true` when the user likes the post after the call. Two
    /// consecutive calls by the same user leave the count unchanged.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        if let Some(index) = self.liked_by.iter().position(|id| *id == user_id) {
            self.liked_by.swap_remove(index);
            false
        } else {
            self.liked_by.push(user_id);
            true
        }
    }
}

fn first_duplicate(ids: &[Uuid]) -> Option<Uuid> {
    ids.iter()
        .enumerate()
        .find(|(index, id)| ids[..*index].contains(id))
        .map(|(_, id)| *id)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CommunityPostDto {
    id: Uuid,
    author_id: Uuid,
    content: String,
    #[serde(default)]
    liked_by: Vec<Uuid>,
    /// Derived from `liked_by`; accepted but recomputed on input.
    #[serde(default)]
    like_count: usize,
    created_at: DateTime<Utc>,
}

impl From<CommunityPost> for CommunityPostDto {
    fn from(value: CommunityPost) -> Self {
        let like_count = value.like_count();
        let CommunityPost {
            id,
            author_id,
            content,
            liked_by,
            created_at,
        } = value;
        Self {
            id,
            author_id,
            content,
            liked_by,
            like_count,
            created_at,
        }
    }
}

impl TryFrom<CommunityPostDto> for CommunityPost {
    type Error = CommunityValidationError;

    fn try_from(value: CommunityPostDto) -> Result<Self, Self::Error> {
        CommunityPost::new(
            value.id,
            value.author_id,
            value.content,
            value.liked_by,
            value.created_at,
        )
    }
}

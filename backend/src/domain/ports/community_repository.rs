//! Port for community post persistence.
//!
//! Like toggling happens inside the adapter so concurrent toggles against the
//! same post serialize on the storage layer, not in handler code.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::CommunityPost;

/// Errors raised by community repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommunityRepositoryError {
    /// Repository connection could not be established.
    #[error("community repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("community repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
    /// A stored row failed domain validation on load.
    #[error("stored post failed validation: {message}")]
    Corrupt {
        /// Description of the validation failure.
        message: String,
    },
}

/// Port for community post storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Insert a new post.
    async fn insert(&self, post: &CommunityPost) -> Result<(), CommunityRepositoryError>;

    /// Fetch a post by id.
    async fn find_by_id(
        &self,
        post_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError>;

    /// List up to `limit` posts, newest first.
    async fn list_recent(&self, limit: usize)
    -> Result<Vec<CommunityPost>, CommunityRepositoryError>;

    /// Flip `user_id`'s like on a post atomically.
    ///
    /// Returns the updated post, or `None` when the post is unknown.
    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct FixtureCommunityRepository {
    posts: Mutex<HashMap<Uuid, CommunityPost>>,
}

impl FixtureCommunityRepository {
    /// Pre-load a post, replacing any previous entry with the same id.
    pub fn seed(&self, post: CommunityPost) {
        self.lock().insert(post.id(), post);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, CommunityPost>> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CommunityRepository for FixtureCommunityRepository {
    async fn insert(&self, post: &CommunityPost) -> Result<(), CommunityRepositoryError> {
        self.lock().insert(post.id(), post.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        post_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError> {
        Ok(self.lock().get(&post_id).cloned())
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<CommunityPost>, CommunityRepositoryError> {
        let mut posts: Vec<_> = self.lock().values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
        posts.truncate(limit);
        Ok(posts)
    }

    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError> {
        let mut posts = self.lock();
        let Some(post) = posts.get_mut(&post_id) else {
            return Ok(None);
        };
        post.toggle_like(user_id);
        Ok(Some(post.clone()))
    }
}

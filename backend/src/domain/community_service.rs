//! Community feed domain service.
//!
//! Posts are shared platform-wide; likes flip per-user set membership on the
//! post, so repeated toggles by one user never inflate the count.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{CommunityRepository, UserRepository};
use crate::domain::service_support::{map_community_repo_error, resolve_user};
use crate::domain::{CivicId, CommunityPost, Error};

/// Number of posts returned by the feed when no limit is supplied.
pub const DEFAULT_FEED_LIMIT: usize = 50;

/// Driving port for the community feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityFeed: Send + Sync {
    /// Publish a post authored by the user with this civic id.
    async fn create_post(
        &self,
        civic_id: &CivicId,
        content: String,
    ) -> Result<CommunityPost, Error>;

    /// Flip the caller's like on a post and return the updated post.
    async fn toggle_like(&self, post_id: Uuid, civic_id: &CivicId)
    -> Result<CommunityPost, Error>;

    /// List recent posts, newest first.
    async fn list_posts(&self) -> Result<Vec<CommunityPost>, Error>;
}

/// Community service implementing the driving port.
#[derive(Clone)]
pub struct CommunityService<U, P> {
    users: Arc<U>,
    posts: Arc<P>,
}

impl<U, P> CommunityService<U, P> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, posts: Arc<P>) -> Self {
        Self { users, posts }
    }
}

#[async_trait]
impl<U, P> CommunityFeed for CommunityService<U, P>
where
    U: UserRepository,
    P: CommunityRepository,
{
    async fn create_post(
        &self,
        civic_id: &CivicId,
        content: String,
    ) -> Result<CommunityPost, Error> {
        let author = resolve_user(self.users.as_ref(), civic_id).await?;
        let post = CommunityPost::compose(Uuid::new_v4(), author.id(), content, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.posts
            .insert(&post)
            .await
            .map_err(map_community_repo_error)?;
        Ok(post)
    }

    async fn toggle_like(
        &self,
        post_id: Uuid,
        civic_id: &CivicId,
    ) -> Result<CommunityPost, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        self.posts
            .toggle_like(post_id, user.id())
            .await
            .map_err(map_community_repo_error)?
            .ok_or_else(|| Error::not_found(format!("community post '{post_id}' not found")))
    }

    async fn list_posts(&self) -> Result<Vec<CommunityPost>, Error> {
        self.posts
            .list_recent(DEFAULT_FEED_LIMIT)
            .await
            .map_err(map_community_repo_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FixtureCommunityRepository, FixtureUserRepository};
    use crate::domain::{User, UserRole};

    fn member(civic_id: &str) -> User {
        User::try_from_strings(
            Uuid::new_v4(),
            civic_id,
            "ada@example.com",
            "Ada Lovelace",
            vec![UserRole::Founder],
        )
        .expect("valid user")
    }

    fn service_with_users(
        users: &[User],
    ) -> CommunityService<FixtureUserRepository, FixtureCommunityRepository> {
        let repo = FixtureUserRepository::default();
        for user in users {
            repo.seed(user.clone());
        }
        CommunityService::new(Arc::new(repo), Arc::new(FixtureCommunityRepository::default()))
    }

    #[tokio::test]
    async fn posts_appear_on_the_feed() {
        let author = member("civic-1");
        let service = service_with_users(&[author.clone()]);

        let post = service
            .create_post(author.civic_id(), "Hiring a founding engineer.".to_owned())
            .await
            .expect("post published");
        let feed = service.list_posts().await.expect("feed listed");
        assert_eq!(feed, vec![post]);
    }

    #[tokio::test]
    async fn toggling_twice_returns_to_the_original_count() {
        let author = member("civic-1");
        let liker = member("civic-2");
        let service = service_with_users(&[author.clone(), liker.clone()]);
        let post = service
            .create_post(author.civic_id(), "Demo day next week.".to_owned())
            .await
            .expect("post published");

        let liked = service
            .toggle_like(post.id(), liker.civic_id())
            .await
            .expect("like applied");
        assert_eq!(liked.like_count(), 1);

        let unliked = service
            .toggle_like(post.id(), liker.civic_id())
            .await
            .expect("like removed");
        assert_eq!(unliked.like_count(), 0);
    }

    #[tokio::test]
    async fn distinct_users_accumulate_likes() {
        let author = member("civic-1");
        let first = member("civic-2");
        let second = member("civic-3");
        let service = service_with_users(&[author.clone(), first.clone(), second.clone()]);
        let post = service
            .create_post(author.civic_id(), "Looking for beta testers.".to_owned())
            .await
            .expect("post published");

        service
            .toggle_like(post.id(), first.civic_id())
            .await
            .expect("first like");
        let updated = service
            .toggle_like(post.id(), second.civic_id())
            .await
            .expect("second like");
        assert_eq!(updated.like_count(), 2);
    }

    #[tokio::test]
    async fn liking_a_missing_post_is_not_found() {
        let user = member("civic-1");
        let service = service_with_users(&[user.clone()]);

        let error = service
            .toggle_like(Uuid::new_v4(), user.civic_id())
            .await
            .expect_err("missing post");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn blank_content_is_an_invalid_request() {
        let user = member("civic-1");
        let service = service_with_users(&[user.clone()]);

        let error = service
            .create_post(user.civic_id(), "  ".to_owned())
            .await
            .expect_err("blank content");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}

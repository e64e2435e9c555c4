//! PostgreSQL-backed `CommunityRepository` implementation using Diesel ORM.
//!
//! Like toggling runs in a transaction with `SELECT ... FOR UPDATE` so
//! concurrent toggles against the same post serialize on the row lock rather
//! than losing writes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CommunityRepository, CommunityRepositoryError};
use crate::domain::CommunityPost;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommunityPostRow, NewCommunityPostRow};
use super::pool::{DbPool, PoolError};
use super::schema::community_posts;

/// Diesel-backed implementation of the community repository port.
#[derive(Clone)]
pub struct DieselCommunityRepository {
    pool: DbPool,
}

impl DieselCommunityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommunityRepositoryError {
    map_basic_pool_error(error, |message| CommunityRepositoryError::Connection {
        message,
    })
}

fn map_diesel_error(error: diesel::result::Error) -> CommunityRepositoryError {
    map_basic_diesel_error(
        error,
        |message| CommunityRepositoryError::Query {
            message: message.to_owned(),
        },
        |message| CommunityRepositoryError::Connection {
            message: message.to_owned(),
        },
    )
}

/// Convert a database row into a validated domain post.
fn row_to_post(row: CommunityPostRow) -> Result<CommunityPost, CommunityRepositoryError> {
    CommunityPost::new(
        row.id,
        row.author_id,
        row.content,
        row.liked_by,
        row.created_at,
    )
    .map_err(|err| CommunityRepositoryError::Corrupt {
        message: err.to_string(),
    })
}

/// Flip `user_id` in a liker set, preserving the order of other likers.
fn toggled_likers(liked_by: &[Uuid], user_id: Uuid) -> Vec<Uuid> {
    if liked_by.contains(&user_id) {
        liked_by
            .iter()
            .copied()
            .filter(|liker| *liker != user_id)
            .collect()
    } else {
        let mut likers = liked_by.to_vec();
        likers.push(user_id);
        likers
    }
}

#[async_trait]
impl CommunityRepository for DieselCommunityRepository {
    async fn insert(&self, post: &CommunityPost) -> Result<(), CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCommunityPostRow {
            id: post.id(),
            author_id: post.author_id(),
            content: post.content(),
            liked_by: post.liked_by().to_vec(),
            created_at: post.created_at(),
        };

        diesel::insert_into(community_posts::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        post_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = community_posts::table
            .filter(community_posts::id.eq(post_id))
            .select(CommunityPostRow::as_select())
            .first::<CommunityPostRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_post).transpose()
    }

    async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<CommunityPost>, CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<CommunityPostRow> = community_posts::table
            .order((
                community_posts::created_at.desc(),
                community_posts::id.desc(),
            ))
            .limit(limit)
            .select(CommunityPostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }

    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CommunityPost>, CommunityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    let current = community_posts::table
                        .filter(community_posts::id.eq(post_id))
                        .for_update()
                        .select(CommunityPostRow::as_select())
                        .first::<CommunityPostRow>(conn)
                        .await
                        .optional()?;

                    let Some(current) = current else {
                        return Ok(None);
                    };

                    let likers = toggled_likers(&current.liked_by, user_id);
                    let updated = diesel::update(
                        community_posts::table.filter(community_posts::id.eq(post_id)),
                    )
                    .set(community_posts::liked_by.eq(likers))
                    .returning(CommunityPostRow::as_select())
                    .get_result::<CommunityPostRow>(conn)
                    .await?;

                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_post).transpose()
    }
}

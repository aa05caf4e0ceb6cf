// src/store/mod.rs

//! Data store access layer.
//!
//! Every relational read and write the service performs goes through the
//! [`DataStore`] trait. Listing operations take id sets and return batched
//! results so that callers never issue one query per item.

#[cfg(test)]
pub(crate) mod counting;
pub mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    comment::{Comment, CommentView},
    notification::{NewNotification, Notification, NotificationView},
    post::{PostDraft, PostRecord, TagCount},
    user::{NewUser, ProfileChanges, User, UserCard, UserDetails, UserSummary},
};

pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle used by the router state.
pub type SharedStore = Arc<dyn DataStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    UniqueViolation(String),

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default().to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(format!(
                    "Duplicate value violates {}",
                    constraint
                ));
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Which posts a listing considers eligible, before pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Published posts, newest first.
    Published,
    /// Published posts whose title contains the needle, case-insensitively.
    TitleContains(String),
    /// Published posts carrying a tag with exactly this name.
    Tagged(String),
    /// Published posts by any of these authors.
    AuthorsIn(Vec<String>),
    /// Published posts by one author.
    AuthoredBy(String),
    /// Unpublished posts of one author, most recently updated first.
    DraftsOf(String),
    /// Posts saved by a user, most recently saved first.
    SavedBy(String),
}

/// A binary relation whose presence is toggled by social actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    Like { user_id: String, post_id: String },
    Save { user_id: String, post_id: String },
    Follow { follower_id: String, following_id: String },
}

#[async_trait]
pub trait DataStore: Send + Sync {
    // users & profiles

    /// Creates the user and an empty profile atomically.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_summary(&self, id: &str) -> StoreResult<Option<UserSummary>>;
    async fn find_user_details(&self, id: &str) -> StoreResult<Option<UserDetails>>;
    /// Returns false when the user does not exist.
    async fn update_profile(&self, user_id: &str, changes: ProfileChanges) -> StoreResult<bool>;
    /// Case-insensitive name search excluding one user, ordered by name descending.
    async fn search_users(
        &self,
        name: &str,
        exclude: &str,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<UserCard>>;
    async fn count_users_matching(&self, name: &str, exclude: &str) -> StoreResult<i64>;
    async fn newest_users(&self, exclude: &str, take: i64) -> StoreResult<Vec<UserCard>>;

    // social graph

    /// Ids of users following `user_id`.
    async fn follower_ids(&self, user_id: &str) -> StoreResult<Vec<String>>;
    /// Ids of users `user_id` follows.
    async fn following_ids(&self, user_id: &str) -> StoreResult<Vec<String>>;
    async fn list_followers(&self, user_id: &str, take: Option<i64>) -> StoreResult<Vec<UserCard>>;
    async fn list_followings(&self, user_id: &str) -> StoreResult<Vec<UserCard>>;
    async fn count_followers(&self, user_id: &str) -> StoreResult<i64>;
    async fn count_followings(&self, user_id: &str) -> StoreResult<i64>;
    /// The subset of `candidates` that `follower_id` follows.
    async fn followed_among(&self, follower_id: &str, candidates: &[String])
        -> StoreResult<Vec<String>>;
    /// Follower counts keyed by followed user id; users without followers are absent.
    async fn group_count_followers(&self, user_ids: &[String]) -> StoreResult<HashMap<String, i64>>;

    // posts & tags

    /// Inserts the post, upserting its tags by name. Returns the new id.
    async fn create_post(&self, author_id: &str, draft: PostDraft) -> StoreResult<String>;
    /// Replaces the post's fields and tag set. Returns false when no post with
    /// this id belongs to `author_id`.
    async fn update_post(&self, id: &str, author_id: &str, draft: PostDraft) -> StoreResult<bool>;
    /// Returns false when no post with this id belongs to `author_id`.
    async fn delete_post(&self, id: &str, author_id: &str) -> StoreResult<bool>;
    async fn find_post(&self, id: &str) -> StoreResult<Option<PostRecord>>;
    async fn find_posts(&self, filter: &PostFilter, skip: i64, take: i64)
        -> StoreResult<Vec<PostRecord>>;
    async fn count_posts(&self, filter: &PostFilter) -> StoreResult<i64>;
    async fn trending_tags(&self, take: i64) -> StoreResult<Vec<TagCount>>;

    // batched relation lookups

    async fn group_count_likes(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>>;
    async fn group_count_comments(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>>;
    /// The subset of `post_ids` liked by `user_id`.
    async fn liked_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>>;
    /// The subset of `post_ids` saved by `user_id`.
    async fn saved_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>>;

    // toggled relations

    /// Inserts the edge unless it already exists. Returns true when a row was inserted.
    async fn insert_edge(&self, edge: &Edge) -> StoreResult<bool>;
    /// Deletes the edge. Returns true when a row was deleted.
    async fn remove_edge(&self, edge: &Edge) -> StoreResult<bool>;

    // comments

    async fn create_comment(&self, post_id: &str, user_id: &str, text: &str) -> StoreResult<Comment>;
    /// Comments of a post, newest first.
    async fn find_comments(&self, post_id: &str, skip: i64, take: i64)
        -> StoreResult<Vec<CommentView>>;
    async fn count_comments(&self, post_id: &str) -> StoreResult<i64>;

    // notifications

    async fn create_notification(&self, notification: NewNotification) -> StoreResult<Notification>;
    async fn unread_notifications(&self, receiver_id: &str) -> StoreResult<Vec<NotificationView>>;
    async fn count_unread_notifications(&self, receiver_id: &str) -> StoreResult<i64>;
    /// Marks one of the receiver's notifications read. Returns false when the
    /// receiver has no notification with this id.
    async fn mark_notification_read(&self, id: &str, receiver_id: &str) -> StoreResult<bool>;
    /// Returns the number of notifications that flipped to read.
    async fn mark_all_notifications_read(&self, receiver_id: &str) -> StoreResult<u64>;
}

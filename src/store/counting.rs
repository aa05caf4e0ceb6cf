// src/store/counting.rs

//! Test double that forwards to a real store and counts every call, so
//! services can assert how many round-trips an operation costs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{DataStore, Edge, PostFilter, StoreResult};
use crate::models::{
    comment::{Comment, CommentView},
    notification::{NewNotification, Notification, NotificationView},
    post::{PostDraft, PostRecord, TagCount},
    user::{NewUser, ProfileChanges, User, UserCard, UserDetails, UserSummary},
};

pub struct CountingStore<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: DataStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    fn counted(&self) -> &S {
        self.calls.fetch_add(1, Ordering::SeqCst);
        &self.inner
    }
}

#[async_trait]
impl<S: DataStore> DataStore for CountingStore<S> {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.counted().create_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.counted().find_user_by_email(email).await
    }

    async fn find_user_summary(&self, id: &str) -> StoreResult<Option<UserSummary>> {
        self.counted().find_user_summary(id).await
    }

    async fn find_user_details(&self, id: &str) -> StoreResult<Option<UserDetails>> {
        self.counted().find_user_details(id).await
    }

    async fn update_profile(&self, user_id: &str, changes: ProfileChanges) -> StoreResult<bool> {
        self.counted().update_profile(user_id, changes).await
    }

    async fn search_users(
        &self,
        name: &str,
        exclude: &str,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<UserCard>> {
        self.counted().search_users(name, exclude, skip, take).await
    }

    async fn count_users_matching(&self, name: &str, exclude: &str) -> StoreResult<i64> {
        self.counted().count_users_matching(name, exclude).await
    }

    async fn newest_users(&self, exclude: &str, take: i64) -> StoreResult<Vec<UserCard>> {
        self.counted().newest_users(exclude, take).await
    }

    async fn follower_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        self.counted().follower_ids(user_id).await
    }

    async fn following_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        self.counted().following_ids(user_id).await
    }

    async fn list_followers(&self, user_id: &str, take: Option<i64>) -> StoreResult<Vec<UserCard>> {
        self.counted().list_followers(user_id, take).await
    }

    async fn list_followings(&self, user_id: &str) -> StoreResult<Vec<UserCard>> {
        self.counted().list_followings(user_id).await
    }

    async fn count_followers(&self, user_id: &str) -> StoreResult<i64> {
        self.counted().count_followers(user_id).await
    }

    async fn count_followings(&self, user_id: &str) -> StoreResult<i64> {
        self.counted().count_followings(user_id).await
    }

    async fn followed_among(
        &self,
        follower_id: &str,
        candidates: &[String],
    ) -> StoreResult<Vec<String>> {
        self.counted().followed_among(follower_id, candidates).await
    }

    async fn group_count_followers(&self, user_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        self.counted().group_count_followers(user_ids).await
    }

    async fn create_post(&self, author_id: &str, draft: PostDraft) -> StoreResult<String> {
        self.counted().create_post(author_id, draft).await
    }

    async fn update_post(&self, id: &str, author_id: &str, draft: PostDraft) -> StoreResult<bool> {
        self.counted().update_post(id, author_id, draft).await
    }

    async fn delete_post(&self, id: &str, author_id: &str) -> StoreResult<bool> {
        self.counted().delete_post(id, author_id).await
    }

    async fn find_post(&self, id: &str) -> StoreResult<Option<PostRecord>> {
        self.counted().find_post(id).await
    }

    async fn find_posts(
        &self,
        filter: &PostFilter,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<PostRecord>> {
        self.counted().find_posts(filter, skip, take).await
    }

    async fn count_posts(&self, filter: &PostFilter) -> StoreResult<i64> {
        self.counted().count_posts(filter).await
    }

    async fn trending_tags(&self, take: i64) -> StoreResult<Vec<TagCount>> {
        self.counted().trending_tags(take).await
    }

    async fn group_count_likes(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        self.counted().group_count_likes(post_ids).await
    }

    async fn group_count_comments(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        self.counted().group_count_comments(post_ids).await
    }

    async fn liked_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>> {
        self.counted().liked_among(user_id, post_ids).await
    }

    async fn saved_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>> {
        self.counted().saved_among(user_id, post_ids).await
    }

    async fn insert_edge(&self, edge: &Edge) -> StoreResult<bool> {
        self.counted().insert_edge(edge).await
    }

    async fn remove_edge(&self, edge: &Edge) -> StoreResult<bool> {
        self.counted().remove_edge(edge).await
    }

    async fn create_comment(&self, post_id: &str, user_id: &str, text: &str) -> StoreResult<Comment> {
        self.counted().create_comment(post_id, user_id, text).await
    }

    async fn find_comments(
        &self,
        post_id: &str,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<CommentView>> {
        self.counted().find_comments(post_id, skip, take).await
    }

    async fn count_comments(&self, post_id: &str) -> StoreResult<i64> {
        self.counted().count_comments(post_id).await
    }

    async fn create_notification(&self, notification: NewNotification) -> StoreResult<Notification> {
        self.counted().create_notification(notification).await
    }

    async fn unread_notifications(&self, receiver_id: &str) -> StoreResult<Vec<NotificationView>> {
        self.counted().unread_notifications(receiver_id).await
    }

    async fn count_unread_notifications(&self, receiver_id: &str) -> StoreResult<i64> {
        self.counted().count_unread_notifications(receiver_id).await
    }

    async fn mark_notification_read(&self, id: &str, receiver_id: &str) -> StoreResult<bool> {
        self.counted().mark_notification_read(id, receiver_id).await
    }

    async fn mark_all_notifications_read(&self, receiver_id: &str) -> StoreResult<u64> {
        self.counted().mark_all_notifications_read(receiver_id).await
    }
}

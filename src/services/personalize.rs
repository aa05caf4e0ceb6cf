// src/services/personalize.rs

use std::collections::{HashMap, HashSet};

use crate::models::post::{ComposedPost, PostFlags, PostRecord};
use crate::store::{DataStore, StoreResult};

use super::Viewer;

/// Viewer-specific facts about a batch of posts, gathered in a fixed number
/// of store round-trips regardless of batch size.
#[derive(Debug, Default)]
pub struct Personalization {
    viewer_id: String,
    likes: HashMap<String, i64>,
    comments: HashMap<String, i64>,
    liked: HashSet<String>,
    saved: HashSet<String>,
    followed: HashSet<String>,
}

impl Personalization {
    pub fn flags(&self, post_id: &str, author_id: &str) -> PostFlags {
        PostFlags {
            like_count: self.likes.get(post_id).copied().unwrap_or(0),
            comment_count: self.comments.get(post_id).copied().unwrap_or(0),
            has_liked: self.liked.contains(post_id),
            has_saved: self.saved.contains(post_id),
            followed_back: self.followed.contains(author_id),
            himself: self.viewer_id == author_id,
        }
    }
}

/// Issues at most five batched lookups, concurrently. An empty post set
/// touches the store zero times.
pub async fn personalize(
    store: &dyn DataStore,
    viewer: &Viewer,
    post_ids: &[String],
    author_ids: &[String],
) -> StoreResult<Personalization> {
    if post_ids.is_empty() {
        return Ok(Personalization {
            viewer_id: viewer.id.clone(),
            ..Default::default()
        });
    }

    let (likes, comments, liked, saved, followed) = tokio::try_join!(
        store.group_count_likes(post_ids),
        store.group_count_comments(post_ids),
        store.liked_among(&viewer.id, post_ids),
        store.saved_among(&viewer.id, post_ids),
        store.followed_among(&viewer.id, author_ids),
    )?;

    Ok(Personalization {
        viewer_id: viewer.id.clone(),
        likes,
        comments,
        liked: liked.into_iter().collect(),
        saved: saved.into_iter().collect(),
        followed: followed.into_iter().collect(),
    })
}

/// Distinct author ids in first-seen order.
pub fn author_ids(posts: &[PostRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .filter(|p| seen.insert(p.author_id.as_str()))
        .map(|p| p.author_id.clone())
        .collect()
}

/// Decorates posts with viewer flags, preserving input order.
pub async fn compose(
    store: &dyn DataStore,
    viewer: &Viewer,
    posts: Vec<PostRecord>,
) -> StoreResult<Vec<ComposedPost>> {
    let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
    let authors = author_ids(&posts);
    let facts = personalize(store, viewer, &post_ids, &authors).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let flags = facts.flags(&post.id, &post.author_id);
            ComposedPost {
                post,
                flags,
                comments: None,
            }
        })
        .collect())
}

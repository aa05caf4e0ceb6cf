// src/models/post.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::comment::CommentView;
use super::user::UserSummary;
use super::validate_image_url;

/// A post as read from the store: the 'posts' row plus its author and tag names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub img_url: Option<String>,
    pub author_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub author: UserSummary,
    pub tags: Vec<String>,
}

/// Viewer-dependent fields derived for each post in a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFlags {
    pub like_count: i64,
    pub comment_count: i64,
    pub has_liked: bool,
    pub has_saved: bool,
    /// The viewer follows the post's author.
    pub followed_back: bool,
    /// The post was written by the viewer.
    pub himself: bool,
}

/// The canonical response shape for a post: record, viewer flags and,
/// for single-post fetches, the most recent comments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedPost {
    #[serde(flatten)]
    pub post: PostRecord,
    #[serde(flatten)]
    pub flags: PostFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// Insert or replace payload for a post. Tag names are upserted by the store.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub img_url: Option<String>,
    pub tags: Vec<String>,
}

/// Tag with the number of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub id: String,
    pub name: String,
    pub post_count: i64,
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 chars"))]
    pub title: Option<String>,

    #[validate(length(max = 100000, message = "Content must be at most 100000 chars"))]
    pub content: Option<String>,

    pub published: Option<bool>,

    #[validate(length(max = 500), custom(function = validate_image_url))]
    pub img_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags per post"))]
    pub tags_names: Vec<String>,
}

/// DTO for updating an existing post. Title and content are mandatory here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub id: String,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 100000, message = "Content is required"))]
    pub content: String,

    pub published: Option<bool>,

    #[validate(length(max = 500), custom(function = validate_image_url))]
    pub img_url: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags per post"))]
    pub tags_names: Vec<String>,
}

/// Normalizes tag names: trims, drops empties and duplicates, keeps first-seen order.
pub fn normalize_tags(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tags_dedups_and_trims() {
        let raw = vec![
            " rust ".to_string(),
            "web".to_string(),
            "rust".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(&raw), vec!["rust", "web"]);
    }

    #[test]
    fn update_requires_title_and_content() {
        let req = UpdatePostRequest {
            id: "x".into(),
            title: "".into(),
            content: "body".into(),
            published: None,
            img_url: None,
            tags_names: vec![],
        };
        assert!(req.validate().is_err());
    }
}

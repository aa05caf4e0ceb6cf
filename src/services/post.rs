// src/services/post.rs

use crate::error::AppError;
use crate::models::comment::CommentView;
use crate::models::feed::{PAGE_SIZE, Page, PageNumber};
use crate::models::post::{
    ComposedPost, CreatePostRequest, PostDraft, PostRecord, TagCount, UpdatePostRequest,
    normalize_tags,
};
use crate::store::DataStore;
use crate::utils::html::clean_html;

use super::{
    Viewer,
    personalize::{compose, personalize},
};

const RECENT_COMMENTS: i64 = 4;
const TRENDING_TAGS: i64 = 15;

fn not_found() -> AppError {
    AppError::NotFound("Blog not found".to_string())
}

/// A post is visible when it is published or the viewer wrote it.
fn visible(post: &PostRecord, viewer: &Viewer) -> bool {
    post.published || viewer.is(&post.author_id)
}

/// Looks a post up, treating someone else's draft as missing.
pub(crate) async fn visible_post(
    store: &dyn DataStore,
    viewer: &Viewer,
    id: &str,
) -> Result<PostRecord, AppError> {
    store
        .find_post(id)
        .await?
        .filter(|p| visible(p, viewer))
        .ok_or_else(not_found)
}

/// One post with its flags and most recent comments.
pub async fn get_post(
    store: &dyn DataStore,
    viewer: &Viewer,
    id: &str,
) -> Result<ComposedPost, AppError> {
    let post = visible_post(store, viewer, id).await?;

    let post_ids = [post.id.clone()];
    let author_ids = [post.author_id.clone()];
    let (facts, comments) = tokio::try_join!(
        personalize(store, viewer, &post_ids, &author_ids),
        store.find_comments(&post.id, 0, RECENT_COMMENTS),
    )?;

    let flags = facts.flags(&post.id, &post.author_id);
    Ok(ComposedPost {
        post,
        flags,
        comments: Some(comments),
    })
}

/// One of the viewer's own unpublished posts.
pub async fn get_draft(
    store: &dyn DataStore,
    viewer: &Viewer,
    id: &str,
) -> Result<ComposedPost, AppError> {
    let post = store
        .find_post(id)
        .await?
        .filter(|p| !p.published && viewer.is(&p.author_id))
        .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))?;

    compose(store, viewer, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))
}

/// Comments of a post the viewer can see, newest first.
pub async fn list_comments(
    store: &dyn DataStore,
    viewer: &Viewer,
    post_id: &str,
    page: PageNumber,
) -> Result<Page<CommentView>, AppError> {
    visible_post(store, viewer, post_id).await?;
    let (items, total) = tokio::try_join!(
        store.find_comments(post_id, page.offset(), PAGE_SIZE),
        store.count_comments(post_id),
    )?;
    Ok(Page::new(items, page, total))
}

pub async fn create_post(
    store: &dyn DataStore,
    viewer: &Viewer,
    req: CreatePostRequest,
) -> Result<String, AppError> {
    let draft = PostDraft {
        title: req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        content: req
            .content
            .map(|c| clean_html(&c))
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "No content".to_string()),
        published: req.published.unwrap_or(false),
        img_url: req.img_url.filter(|u| !u.is_empty()),
        tags: normalize_tags(&req.tags_names),
    };
    let id = store.create_post(&viewer.id, draft).await?;
    tracing::info!(author = %viewer.id, post = %id, "post created");
    Ok(id)
}

/// Replaces an existing post of the viewer. `id` is the validated post id.
pub async fn update_post(
    store: &dyn DataStore,
    viewer: &Viewer,
    id: &str,
    req: UpdatePostRequest,
) -> Result<(), AppError> {
    let draft = PostDraft {
        title: req.title.trim().to_string(),
        content: clean_html(&req.content),
        published: req.published.unwrap_or(false),
        img_url: req.img_url.filter(|u| !u.is_empty()),
        tags: normalize_tags(&req.tags_names),
    };
    if !store.update_post(id, &viewer.id, draft).await? {
        return Err(not_found());
    }
    Ok(())
}

pub async fn delete_post(store: &dyn DataStore, viewer: &Viewer, id: &str) -> Result<(), AppError> {
    if !store.delete_post(id, &viewer.id).await? {
        return Err(not_found());
    }
    tracing::info!(author = %viewer.id, post = %id, "post deleted");
    Ok(())
}

pub async fn trending_tags(store: &dyn DataStore) -> Result<Vec<TagCount>, AppError> {
    Ok(store.trending_tags(TRENDING_TAGS).await?)
}

// src/handlers/community.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        comment::CommentListParams,
        feed::{FilterParams, PageNumber, PageParams},
        post::{CreatePostRequest, UpdatePostRequest},
    },
    services::{
        feed::{FeedScope, compose_feed},
        post,
    },
    store::SharedStore,
    utils::{id::parse_id, json::AppJson, jwt::Claims},
};

/// Runs a feed scope and renders the paged `blogs` envelope.
async fn feed_response(
    store: &SharedStore,
    claims: &Claims,
    scope: FeedScope,
    page: Option<String>,
    msg: &str,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = PageNumber::parse(page.as_deref());
    let blogs = compose_feed(store.as_ref(), &claims.viewer(), scope, page).await?;
    Ok(Json(blogs.into_body(msg, "blogs")?))
}

/// Creates a post. Content is sanitised and tags are upserted by name.
pub async fn create_blog(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = post::create_post(store.as_ref(), &claims.viewer(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Blog successfully created",
            "blogId": id,
        })),
    ))
}

/// Replaces one of the caller's posts.
pub async fn update_blog(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let id = parse_id(&payload.id, "blog")?;

    post::update_post(store.as_ref(), &claims.viewer(), &id, payload).await?;

    Ok(Json(json!({
        "msg": "Blog successfully updated",
        "blogId": id,
    })))
}

pub async fn delete_blog(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&post_id, "blog")?;
    post::delete_post(store.as_ref(), &claims.viewer(), &id).await?;

    Ok(Json(json!({ "msg": "Post was successfully deleted" })))
}

/// Single post with flags and its four most recent comments.
pub async fn get_blog(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "blog")?;
    let blog = post::get_post(store.as_ref(), &claims.viewer(), &id).await?;

    Ok(Json(json!({
        "msg": "Blog found successfully",
        "blog": blog,
    })))
}

pub async fn list_blogs(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    feed_response(&store, &claims, FeedScope::AllPublished, params.page, "All blogs found").await
}

/// Published posts whose title contains `filter`.
pub async fn filter_blogs(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let scope = FeedScope::text(params.filter)?;
    feed_response(&store, &claims, scope, params.page, "All blogs found").await
}

/// Published posts tagged exactly `filter`.
pub async fn filter_blogs_by_tag(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let scope = FeedScope::tag(params.filter)?;
    feed_response(&store, &claims, scope, params.page, "All blogs found").await
}

pub async fn trending_tags(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let tags = post::trending_tags(store.as_ref()).await?;

    Ok(Json(json!({
        "msg": "Successfully found trending tags",
        "trendingTags": tags,
    })))
}

pub async fn followers_blogs(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    feed_response(
        &store,
        &claims,
        FeedScope::FollowersOfViewer,
        params.page,
        "All followers blogs found",
    )
    .await
}

pub async fn followings_blogs(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    feed_response(
        &store,
        &claims,
        FeedScope::FollowingsOfViewer,
        params.page,
        "All followings blogs found",
    )
    .await
}

pub async fn list_drafts(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageNumber::parse(params.page.as_deref());
    let drafts = compose_feed(store.as_ref(), &claims.viewer(), FeedScope::DraftsOfViewer, page).await?;
    Ok(Json(drafts.into_body("Successfully found all the drafts", "drafts")?))
}

pub async fn get_draft(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&post_id, "blog")?;
    let draft = post::get_draft(store.as_ref(), &claims.viewer(), &id).await?;

    Ok(Json(json!({
        "msg": "Successfully found the draft",
        "draft": draft,
    })))
}

pub async fn saved_blogs(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    feed_response(&store, &claims, FeedScope::SavedByViewer, params.page, "All blogs found").await
}

/// Paged comments of `postId`, newest first.
pub async fn list_comments(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<CommentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let raw = params
        .post_id
        .ok_or_else(|| AppError::BadRequest("Invalid postId".to_string()))?;
    let post_id = parse_id(&raw, "post")?;
    let page = PageNumber::parse(params.page.as_deref());

    let comments = post::list_comments(store.as_ref(), &claims.viewer(), &post_id, page).await?;
    Ok(Json(comments.into_body("All comments found successfully", "comments")?))
}

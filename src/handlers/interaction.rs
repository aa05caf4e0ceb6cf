// src/handlers/interaction.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::CreateCommentRequest,
    services::toggle::{self, ToggleOutcome},
    store::SharedStore,
    utils::{id::parse_id, json::AppJson, jwt::Claims},
};

/// 201 with `created`, 200 with `removed`.
fn toggle_response(outcome: ToggleOutcome, created: &str, removed: &str) -> impl IntoResponse {
    let (status, msg) = match outcome {
        ToggleOutcome::Created => (StatusCode::CREATED, created),
        ToggleOutcome::Removed => (StatusCode::OK, removed),
    };
    (status, Json(json!({ "msg": msg, "state": outcome })))
}

/// Toggle Like on a post. Liking notifies the post's author.
pub async fn toggle_like(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id, "post")?;
    let outcome = toggle::toggle_like(store.as_ref(), &claims.viewer(), &post_id).await?;

    Ok(toggle_response(
        outcome,
        "Successfully liked the post",
        "Successfully post was unliked",
    ))
}

/// Toggle Save on a post.
pub async fn toggle_save(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id, "post")?;
    let outcome = toggle::toggle_save(store.as_ref(), &claims.viewer(), &post_id).await?;

    Ok(toggle_response(
        outcome,
        "Successfully post was saved",
        "Successfully unsaved the post",
    ))
}

/// Toggle Follow on a user. Following oneself is a conflict.
pub async fn toggle_follow(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(following_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let following_id = parse_id(&following_id, "user")?;
    let outcome = toggle::toggle_follow(store.as_ref(), &claims.viewer(), &following_id).await?;

    Ok(toggle_response(
        outcome,
        "Successfully followed the user",
        "Successfully unfollowed the user",
    ))
}

/// Adds a comment to a post.
pub async fn create_comment(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<String>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let post_id = parse_id(&post_id, "post")?;

    let comment =
        toggle::create_comment(store.as_ref(), &claims.viewer(), &post_id, payload.comment.trim())
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Successfully created comment",
            "comment": comment,
        })),
    ))
}

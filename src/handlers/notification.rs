// src/handlers/notification.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    services::notify,
    store::SharedStore,
    utils::{id::parse_id, jwt::Claims},
};

/// Unread notifications, newest first.
pub async fn list_unread(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = notify::unread(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "Successfully fetched all the notifications",
        "notifications": notifications,
    })))
}

pub async fn count_unread(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let count = notify::unread_count(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "Successfully counted the notifications",
        "count": count,
    })))
}

pub async fn mark_read(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "notification")?;
    notify::mark_read(store.as_ref(), &claims.viewer(), &id).await?;

    Ok(Json(json!({ "msg": "Successfully marked the notification read" })))
}

pub async fn mark_all_read(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let updated = notify::mark_all_read(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "Successfully marked all the notifications read",
        "updated": updated,
    })))
}

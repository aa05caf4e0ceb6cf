// src/handlers/user.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{feed::PageNumber, user::UserSearchParams},
    services::social,
    store::SharedStore,
    utils::{id::parse_id, jwt::Claims},
};

/// Name search over other users, paged by 10.
pub async fn search_users(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<UserSearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageNumber::parse(params.page.as_deref());
    let users = social::search_users(store.as_ref(), &claims.viewer(), params.filter, page).await?;

    Ok(Json(users.into_body("Users found successfully", "users")?))
}

pub async fn newest_users(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let users = social::newest_users(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "Users found successfully",
        "users": users,
    })))
}

pub async fn followers(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let (users, total) = social::followers(store.as_ref(), &claims.viewer(), &user_id).await?;

    Ok(Json(json!({
        "msg": "Successfully found all the followers",
        "users": users,
        "total": total,
    })))
}

pub async fn followings(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let (users, total) = social::followings(store.as_ref(), &claims.viewer(), &user_id).await?;

    Ok(Json(json!({
        "msg": "Successfully found all the followings",
        "users": users,
        "total": total,
    })))
}

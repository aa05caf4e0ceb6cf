// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        feed::{PageNumber, PageParams},
        user::UpdateProfileRequest,
    },
    services::social,
    store::SharedStore,
    utils::{id::parse_id, json::AppJson, jwt::Claims},
};

/// The caller's profile, counts and a page of their published posts.
pub async fn get_own_profile(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageNumber::parse(params.page.as_deref());
    let (user, blogs) = social::own_profile(store.as_ref(), &claims.viewer(), page).await?;

    let mut body = blogs.into_body("All blogs and user details found", "blogs")?;
    body["user"] = json!(user);
    Ok(Json(body))
}

pub async fn get_own_details(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = social::details(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "User details found",
        "user": user,
    })))
}

/// Another user's profile as the caller sees it, with up to five followers.
pub async fn get_profile(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let page = PageNumber::parse(params.page.as_deref());
    let (user, blogs, followers) =
        social::public_profile(store.as_ref(), &claims.viewer(), &user_id, page).await?;

    let mut body = blogs.into_body("All blogs and user details found", "blogs")?;
    body["user"] = json!(user);
    body["followers"] = json!(followers);
    Ok(Json(body))
}

pub async fn update_profile(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = social::update_profile(store.as_ref(), &claims.viewer(), payload.into()).await?;

    Ok(Json(json!({
        "msg": "Profile updated successfully",
        "user": user,
    })))
}

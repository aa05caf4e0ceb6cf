// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{NewUser, SigninRequest, SignupRequest},
    services::social,
    store::SharedStore,
    utils::{
        hash::{hash_password, verify_password},
        json::AppJson,
        jwt::{Claims, sign_jwt},
    },
};

/// Display name used when signup omits one: the email's local part.
fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// Registers a new user and signs them in.
///
/// Hashes the password using Argon2 before storing it. The user and an empty
/// profile are created together. Returns 201 Created with a bearer token.
pub async fn signup(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let name = payload
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_name(&email));

    let user = store
        .create_user(NewUser {
            email,
            password_hash: hash_password(&payload.password)?,
            name,
        })
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
            other => {
                tracing::error!("Failed to register user: {:?}", other);
                other
            }
        })?;

    let token = sign_jwt(&user.id, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!(user = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "User created successfully",
            "token": token,
            "type": "Bearer",
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
pub async fn signin(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    AppJson(payload): AppJson<SigninRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid email and password".to_string());

    let user = store
        .find_user_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(&user.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "msg": "User successfully signed in",
        "token": token,
        "type": "Bearer",
    })))
}

/// The signed-in user's avatar url.
pub async fn avatar(
    State(store): State<SharedStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let image_url = social::avatar(store.as_ref(), &claims.viewer()).await?;

    Ok(Json(json!({
        "msg": "User detail found",
        "userAvatar": image_url,
    })))
}

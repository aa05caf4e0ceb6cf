// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, community, interaction, notification, profile, user},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Nests the user, blog, profile and notification routers under `/api/v1`.
/// * Everything except signup and signin requires a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let user_routes = Router::new()
        .route("/avatar", get(auth::avatar))
        .route("/bulk/filter", get(user::search_users))
        .route("/bulk/new", get(user::newest_users))
        .route("/follow/{following_id}", post(interaction::toggle_follow))
        .route("/follower/get/{user_id}", get(user::followers))
        .route("/following/get/{user_id}", get(user::followings))
        .layer(require_auth.clone())
        // Public
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin));

    let blog_routes = Router::new()
        .route("/create", post(community::create_blog))
        .route("/update", put(community::update_blog))
        .route("/delete/{post_id}", delete(community::delete_blog))
        .route("/get/{id}", get(community::get_blog))
        .route("/bulk", get(community::list_blogs))
        .route("/filter", get(community::filter_blogs))
        .route("/tags/filter", get(community::filter_blogs_by_tag))
        .route("/tags/trend", get(community::trending_tags))
        .route("/followers/blogs", get(community::followers_blogs))
        .route("/followings/blogs", get(community::followings_blogs))
        .route("/draft", get(community::list_drafts))
        .route("/draft/get/{post_id}", get(community::get_draft))
        .route("/saved/get", get(community::saved_blogs))
        .route("/saved/toggle/{post_id}", post(interaction::toggle_save))
        .route("/like/toggle/{post_id}", post(interaction::toggle_like))
        .route("/comments", get(community::list_comments))
        .route("/comment/create/{post_id}", post(interaction::create_comment))
        .layer(require_auth.clone());

    let profile_routes = Router::new()
        .route("/get", get(profile::get_own_profile))
        .route("/get/details", get(profile::get_own_details))
        .route("/specific/{user_id}", get(profile::get_profile))
        .route("/update", put(profile::update_profile))
        .layer(require_auth.clone());

    let notification_routes = Router::new()
        .route("/get", get(notification::list_unread))
        .route("/get/count", get(notification::count_unread))
        .route("/read/{id}", put(notification::mark_read))
        .route("/all", put(notification::mark_all_read))
        .layer(require_auth);

    Router::new()
        .nest("/api/v1/user", user_routes)
        .nest("/api/v1/blog", blog_routes)
        .nest("/api/v1/profile", profile_routes)
        .nest("/api/v1/notification", notification_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

// src/services/toggle.rs

use serde::Serialize;

use crate::error::AppError;
use crate::models::comment::Comment;
use crate::models::user::UserSummary;
use crate::store::{DataStore, Edge};

use super::{Viewer, notify, post::visible_post};

/// Result of flipping a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Created,
    Removed,
}

/// Removes the edge if present, otherwise inserts it.
///
/// Returns the outcome and whether this call performed the insert. When two
/// requests race to create the same edge, the loser still reports `Created`
/// but `false`, so only one of them notifies.
async fn toggle(store: &dyn DataStore, edge: &Edge) -> Result<(ToggleOutcome, bool), AppError> {
    if store.remove_edge(edge).await? {
        return Ok((ToggleOutcome::Removed, false));
    }
    let inserted = store.insert_edge(edge).await?;
    if !inserted {
        tracing::debug!(?edge, "concurrent toggle already created the edge");
    }
    Ok((ToggleOutcome::Created, inserted))
}

async fn actor(store: &dyn DataStore, viewer: &Viewer) -> Result<UserSummary, AppError> {
    store
        .find_user_summary(&viewer.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Likes or unlikes a post the viewer can see. Only a like that actually
/// created the row notifies the author.
pub async fn toggle_like(
    store: &dyn DataStore,
    viewer: &Viewer,
    post_id: &str,
) -> Result<ToggleOutcome, AppError> {
    let post = visible_post(store, viewer, post_id).await?;
    let edge = Edge::Like {
        user_id: viewer.id.clone(),
        post_id: post.id.clone(),
    };
    let (outcome, inserted) = toggle(store, &edge).await?;

    if inserted {
        let actor = actor(store, viewer).await?;
        notify::post_liked(store, &actor, &post).await?;
    }

    tracing::info!(user = %viewer.id, post = %post_id, ?outcome, "like toggled");
    Ok(outcome)
}

pub async fn toggle_save(
    store: &dyn DataStore,
    viewer: &Viewer,
    post_id: &str,
) -> Result<ToggleOutcome, AppError> {
    let post = visible_post(store, viewer, post_id).await?;
    let edge = Edge::Save {
        user_id: viewer.id.clone(),
        post_id: post.id,
    };
    let (outcome, _) = toggle(store, &edge).await?;
    tracing::info!(user = %viewer.id, post = %post_id, ?outcome, "save toggled");
    Ok(outcome)
}

/// Follows or unfollows `following_id`. Following oneself is rejected before
/// the store is touched.
pub async fn toggle_follow(
    store: &dyn DataStore,
    viewer: &Viewer,
    following_id: &str,
) -> Result<ToggleOutcome, AppError> {
    if viewer.is(following_id) {
        return Err(AppError::Conflict("You cannot follow yourself".to_string()));
    }

    let edge = Edge::Follow {
        follower_id: viewer.id.clone(),
        following_id: following_id.to_string(),
    };
    let (outcome, inserted) = toggle(store, &edge).await?;

    if inserted {
        let actor = actor(store, viewer).await?;
        notify::user_followed(store, &actor, following_id).await?;
    }

    tracing::info!(user = %viewer.id, target = %following_id, ?outcome, "follow toggled");
    Ok(outcome)
}

/// Adds a comment to a post the viewer can see and notifies its author.
pub async fn create_comment(
    store: &dyn DataStore,
    viewer: &Viewer,
    post_id: &str,
    text: &str,
) -> Result<Comment, AppError> {
    let (post, actor) = tokio::try_join!(visible_post(store, viewer, post_id), actor(store, viewer))?;
    let comment = store.create_comment(&post.id, &viewer.id, text).await?;
    notify::post_commented(store, &actor, &post).await?;
    Ok(comment)
}

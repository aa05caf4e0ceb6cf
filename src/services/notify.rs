// src/services/notify.rs

use crate::error::AppError;
use crate::models::notification::{NewNotification, Notification, NotificationKind, NotificationView};
use crate::models::post::PostRecord;
use crate::models::user::UserSummary;
use crate::store::{DataStore, StoreResult};

use super::Viewer;

pub fn like_message(actor: &str, title: &str) -> String {
    format!("{actor} liked your post \"{title}\"")
}

pub fn comment_message(actor: &str, title: &str) -> String {
    format!("{actor} commented on your post \"{title}\"")
}

pub fn follow_message(actor: &str) -> String {
    format!("{actor} started following you")
}

/// Notifies the post's author that `actor` liked it.
pub async fn post_liked(
    store: &dyn DataStore,
    actor: &UserSummary,
    post: &PostRecord,
) -> StoreResult<Notification> {
    emit(
        store,
        NewNotification {
            kind: NotificationKind::Like,
            message: like_message(&actor.name, &post.title),
            post_id: Some(post.id.clone()),
            sender_id: actor.id.clone(),
            receiver_id: post.author_id.clone(),
        },
    )
    .await
}

/// Notifies the post's author that `actor` commented on it.
pub async fn post_commented(
    store: &dyn DataStore,
    actor: &UserSummary,
    post: &PostRecord,
) -> StoreResult<Notification> {
    emit(
        store,
        NewNotification {
            kind: NotificationKind::Comment,
            message: comment_message(&actor.name, &post.title),
            post_id: Some(post.id.clone()),
            sender_id: actor.id.clone(),
            receiver_id: post.author_id.clone(),
        },
    )
    .await
}

pub async fn user_followed(
    store: &dyn DataStore,
    actor: &UserSummary,
    followed_id: &str,
) -> StoreResult<Notification> {
    emit(
        store,
        NewNotification {
            kind: NotificationKind::Follow,
            message: follow_message(&actor.name),
            post_id: None,
            sender_id: actor.id.clone(),
            receiver_id: followed_id.to_string(),
        },
    )
    .await
}

async fn emit(store: &dyn DataStore, notification: NewNotification) -> StoreResult<Notification> {
    let created = store.create_notification(notification).await?;
    tracing::debug!(
        kind = %created.kind,
        receiver = %created.receiver_id,
        "notification emitted"
    );
    Ok(created)
}

/// Unread notifications of the viewer, newest first.
pub async fn unread(store: &dyn DataStore, viewer: &Viewer) -> Result<Vec<NotificationView>, AppError> {
    Ok(store.unread_notifications(&viewer.id).await?)
}

pub async fn unread_count(store: &dyn DataStore, viewer: &Viewer) -> Result<i64, AppError> {
    Ok(store.count_unread_notifications(&viewer.id).await?)
}

/// Marks one of the viewer's notifications read. Re-marking is a no-op.
pub async fn mark_read(store: &dyn DataStore, viewer: &Viewer, id: &str) -> Result<(), AppError> {
    if !store.mark_notification_read(id, &viewer.id).await? {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(())
}

pub async fn mark_all_read(store: &dyn DataStore, viewer: &Viewer) -> Result<u64, AppError> {
    Ok(store.mark_all_notifications_read(&viewer.id).await?)
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::models::user::NewUser;
    use crate::store::PgStore;

    #[test]
    fn messages_name_actor_and_post() {
        assert_eq!(like_message("Ada", "Hello"), "Ada liked your post \"Hello\"");
        assert_eq!(
            comment_message("Ada", "Hello"),
            "Ada commented on your post \"Hello\""
        );
        assert_eq!(follow_message("Ada"), "Ada started following you");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn reading_is_scoped_to_the_receiver(pool: PgPool) {
        let store = PgStore::new(pool);
        let mut ids = Vec::new();
        for name in ["ada", "bob"] {
            let user = store
                .create_user(NewUser {
                    email: format!("{name}@example.com"),
                    password_hash: "x".into(),
                    name: name.into(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let ada = UserSummary { id: ids[0].clone(), name: "ada".into(), image_url: None };
        let bob = Viewer::new(ids[1].clone());

        let first = user_followed(&store, &ada, &bob.id).await.unwrap();
        user_followed(&store, &ada, &bob.id).await.unwrap();
        assert_eq!(unread_count(&store, &bob).await.unwrap(), 2);

        let listed = unread(&store, &bob).await.unwrap();
        assert_eq!(listed[0].sender.id, ada.id);
        assert_eq!(listed[0].message, "ada started following you");

        let as_ada = Viewer::new(ada.id.clone());
        assert!(matches!(
            mark_read(&store, &as_ada, &first.id).await,
            Err(AppError::NotFound(_))
        ));

        mark_read(&store, &bob, &first.id).await.unwrap();
        mark_read(&store, &bob, &first.id).await.unwrap();
        assert_eq!(unread_count(&store, &bob).await.unwrap(), 1);

        assert_eq!(mark_all_read(&store, &bob).await.unwrap(), 1);
        assert!(unread(&store, &bob).await.unwrap().is_empty());
    }
}

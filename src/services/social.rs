// src/services/social.rs

//! User listings and profile pages.

use std::collections::HashSet;

use crate::error::AppError;
use crate::models::feed::{PAGE_SIZE, Page, PageNumber};
use crate::models::post::ComposedPost;
use crate::models::user::{
    DEFAULT_AVATAR, OwnProfile, ProfileChanges, PublicProfile, SocialUser, UserCard, UserDetails,
};
use crate::store::DataStore;

use super::{
    Viewer,
    feed::{FeedScope, compose_feed, required_filter},
};

const NEWEST_USERS: i64 = 5;
const PROFILE_FOLLOWERS: i64 = 5;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Adds viewer flags to user cards with one batched lookup, plus one more
/// when follower counts are wanted.
async fn personalize_users(
    store: &dyn DataStore,
    viewer: &Viewer,
    cards: Vec<UserCard>,
    with_counts: bool,
) -> Result<Vec<SocialUser>, AppError> {
    if cards.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();

    let (followed, counts) = tokio::try_join!(store.followed_among(&viewer.id, &ids), async {
        if with_counts {
            store.group_count_followers(&ids).await.map(Some)
        } else {
            Ok(None)
        }
    })?;
    let followed: HashSet<String> = followed.into_iter().collect();

    Ok(cards
        .into_iter()
        .map(|card| SocialUser {
            followed_back: followed.contains(&card.id),
            himself: viewer.is(&card.id),
            followers_count: counts
                .as_ref()
                .map(|c| c.get(&card.id).copied().unwrap_or(0)),
            image_url: card.image_url.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            id: card.id,
            name: card.name,
            bio: card.bio,
        })
        .collect())
}

/// Case-insensitive name search over everyone but the viewer.
pub async fn search_users(
    store: &dyn DataStore,
    viewer: &Viewer,
    filter: Option<String>,
    page: PageNumber,
) -> Result<Page<SocialUser>, AppError> {
    let needle = required_filter(filter)?;
    let (cards, total) = tokio::try_join!(
        store.search_users(&needle, &viewer.id, page.offset(), PAGE_SIZE),
        store.count_users_matching(&needle, &viewer.id),
    )?;
    let users = personalize_users(store, viewer, cards, false).await?;
    Ok(Page::new(users, page, total))
}

/// The most recently registered other users, with follower counts.
pub async fn newest_users(store: &dyn DataStore, viewer: &Viewer) -> Result<Vec<SocialUser>, AppError> {
    let cards = store.newest_users(&viewer.id, NEWEST_USERS).await?;
    personalize_users(store, viewer, cards, true).await
}

/// Everyone following `user_id`, and how many they are.
pub async fn followers(
    store: &dyn DataStore,
    viewer: &Viewer,
    user_id: &str,
) -> Result<(Vec<SocialUser>, i64), AppError> {
    let (user, cards, total) = tokio::try_join!(
        store.find_user_summary(user_id),
        store.list_followers(user_id, None),
        store.count_followers(user_id),
    )?;
    user.ok_or_else(user_not_found)?;
    Ok((personalize_users(store, viewer, cards, false).await?, total))
}

/// Everyone `user_id` follows, and how many they are.
pub async fn followings(
    store: &dyn DataStore,
    viewer: &Viewer,
    user_id: &str,
) -> Result<(Vec<SocialUser>, i64), AppError> {
    let (user, cards, total) = tokio::try_join!(
        store.find_user_summary(user_id),
        store.list_followings(user_id),
        store.count_followings(user_id),
    )?;
    user.ok_or_else(user_not_found)?;
    Ok((personalize_users(store, viewer, cards, false).await?, total))
}

pub async fn avatar(store: &dyn DataStore, viewer: &Viewer) -> Result<String, AppError> {
    let user = store.find_user_summary(&viewer.id).await?.ok_or_else(user_not_found)?;
    Ok(user.image_url.unwrap_or_else(|| DEFAULT_AVATAR.to_string()))
}

pub async fn details(store: &dyn DataStore, viewer: &Viewer) -> Result<UserDetails, AppError> {
    store
        .find_user_details(&viewer.id)
        .await?
        .ok_or_else(user_not_found)
}

/// The viewer's own profile with a page of their published posts.
pub async fn own_profile(
    store: &dyn DataStore,
    viewer: &Viewer,
    page: PageNumber,
) -> Result<(OwnProfile, Page<ComposedPost>), AppError> {
    let (user, followers, following, posts) = tokio::try_join!(
        async { Ok::<_, AppError>(store.find_user_details(&viewer.id).await?) },
        async { Ok::<_, AppError>(store.count_followers(&viewer.id).await?) },
        async { Ok::<_, AppError>(store.count_followings(&viewer.id).await?) },
        compose_feed(store, viewer, FeedScope::AuthoredBy(viewer.id.clone()), page),
    )?;
    let user = user.ok_or_else(user_not_found)?;

    Ok((
        OwnProfile {
            user,
            followers,
            following,
        },
        posts,
    ))
}

/// Someone's profile as the viewer sees it: counts, whether the viewer
/// follows them, their published posts and up to five of their followers.
pub async fn public_profile(
    store: &dyn DataStore,
    viewer: &Viewer,
    user_id: &str,
    page: PageNumber,
) -> Result<(PublicProfile, Page<ComposedPost>, Vec<SocialUser>), AppError> {
    let target = [user_id.to_string()];
    let (user, followers_count, following_count, followed, recent_followers, posts) = tokio::try_join!(
        async { Ok::<_, AppError>(store.find_user_details(user_id).await?) },
        async { Ok::<_, AppError>(store.count_followers(user_id).await?) },
        async { Ok::<_, AppError>(store.count_followings(user_id).await?) },
        async { Ok::<_, AppError>(store.followed_among(&viewer.id, &target).await?) },
        async { Ok::<_, AppError>(store.list_followers(user_id, Some(PROFILE_FOLLOWERS)).await?) },
        compose_feed(store, viewer, FeedScope::AuthoredBy(user_id.to_string()), page),
    )?;
    let user = user.ok_or_else(user_not_found)?;
    let recent_followers = personalize_users(store, viewer, recent_followers, true).await?;

    Ok((
        PublicProfile {
            user,
            followers_count,
            following_count,
            has_followed: !followed.is_empty(),
        },
        posts,
        recent_followers,
    ))
}

pub async fn update_profile(
    store: &dyn DataStore,
    viewer: &Viewer,
    changes: ProfileChanges,
) -> Result<UserDetails, AppError> {
    if !store.update_profile(&viewer.id, changes).await? {
        return Err(user_not_found());
    }
    details(store, viewer).await
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::models::post::PostDraft;
    use crate::models::user::NewUser;
    use crate::store::{Edge, PgStore};

    async fn user(store: &dyn DataStore, name: &str) -> Viewer {
        let user = store
            .create_user(NewUser {
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "x".into(),
                name: name.into(),
            })
            .await
            .unwrap();
        Viewer::new(user.id)
    }

    async fn follow(store: &dyn DataStore, from: &Viewer, to: &Viewer) {
        store
            .insert_edge(&Edge::Follow {
                follower_id: from.id.clone(),
                following_id: to.id.clone(),
            })
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn search_excludes_viewer_and_flags_follows(pool: PgPool) {
        let store = PgStore::new(pool);
        let me = user(&store, "Anna").await;
        let ann = user(&store, "Annabel").await;
        user(&store, "Hannah").await;
        user(&store, "Bob").await;
        follow(&store, &me, &ann).await;

        let page = search_users(&store, &me, Some("ANN".into()), PageNumber::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        let names: Vec<&str> = page.items.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Hannah", "Annabel"]);
        assert!(page.items[1].followed_back);
        assert!(!page.items[0].followed_back);
        assert!(page.items.iter().all(|u| !u.himself && u.followers_count.is_none()));

        assert!(matches!(
            search_users(&store, &me, None, PageNumber::default()).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn newest_users_carry_follower_counts(pool: PgPool) {
        let store = PgStore::new(pool);
        let me = user(&store, "me").await;
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;
        follow(&store, &me, &a).await;
        follow(&store, &b, &a).await;

        let newest = newest_users(&store, &me).await.unwrap();
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].id, b.id);
        assert_eq!(newest[1].followers_count, Some(2));
        assert!(newest[1].followed_back);
        assert_eq!(newest[0].followers_count, Some(0));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn follower_lists_report_totals(pool: PgPool) {
        let store = PgStore::new(pool);
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;
        let c = user(&store, "c").await;
        follow(&store, &a, &c).await;
        follow(&store, &b, &c).await;
        follow(&store, &c, &a).await;

        let (list, total) = followers(&store, &a, &c.id).await.unwrap();
        assert_eq!(total, 2);
        let me = list.iter().find(|u| u.id == a.id).unwrap();
        assert!(me.himself);

        let (list, total) = followings(&store, &a, &c.id).await.unwrap();
        assert_eq!(total, 1);
        assert!(list[0].himself);

        let ghost = uuid::Uuid::new_v4().to_string();
        assert!(matches!(followers(&store, &a, &ghost).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn profiles_show_counts_and_posts(pool: PgPool) {
        let store = PgStore::new(pool);
        let me = user(&store, "me").await;
        let them = user(&store, "them").await;
        follow(&store, &me, &them).await;
        store
            .create_post(
                &them.id,
                PostDraft {
                    title: "theirs".into(),
                    content: "body".into(),
                    published: true,
                    img_url: None,
                    tags: vec![],
                },
            )
            .await
            .unwrap();

        let (profile, posts, recent) = public_profile(&store, &me, &them.id, PageNumber::default())
            .await
            .unwrap();
        assert!(profile.has_followed);
        assert_eq!(profile.followers_count, 1);
        assert_eq!(profile.following_count, 0);
        assert_eq!(posts.total, 1);
        assert!(posts.items[0].flags.followed_back);
        assert_eq!(recent.len(), 1);
        assert!(recent[0].himself);

        let (own, own_posts) = own_profile(&store, &me, PageNumber::default()).await.unwrap();
        assert_eq!(own.following, 1);
        assert_eq!(own.followers, 0);
        assert_eq!(own_posts.total, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn profile_updates_are_applied(pool: PgPool) {
        let store = PgStore::new(pool);
        let me = user(&store, "me").await;
        let updated = update_profile(
            &store,
            &me,
            ProfileChanges {
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.name, "me");
        assert_eq!(avatar(&store, &me).await.unwrap(), DEFAULT_AVATAR);
    }
}

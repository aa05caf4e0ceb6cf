// src/services/feed.rs

use crate::error::AppError;
use crate::models::feed::{PAGE_SIZE, Page, PageNumber};
use crate::models::post::ComposedPost;
use crate::store::{DataStore, PostFilter};

use super::{Viewer, personalize::compose};

/// Which posts a feed lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    AllPublished,
    TextFilter(String),
    TagFilter(String),
    /// Published posts of users who follow the viewer.
    FollowersOfViewer,
    /// Published posts of users the viewer follows.
    FollowingsOfViewer,
    DraftsOfViewer,
    SavedByViewer,
    AuthoredBy(String),
}

impl FeedScope {
    /// Builds a filter scope from an optional query value. A missing or blank
    /// filter is rejected.
    pub fn text(filter: Option<String>) -> Result<Self, AppError> {
        Ok(FeedScope::TextFilter(required_filter(filter)?))
    }

    pub fn tag(filter: Option<String>) -> Result<Self, AppError> {
        Ok(FeedScope::TagFilter(required_filter(filter)?))
    }
}

/// Trims a filter query value; missing or blank input is a bad request.
pub(crate) fn required_filter(filter: Option<String>) -> Result<String, AppError> {
    match filter.map(|f| f.trim().to_string()) {
        Some(f) if !f.is_empty() => Ok(f),
        _ => Err(AppError::BadRequest("filter is required".to_string())),
    }
}

/// Resolves the scope to a store filter. `None` means the scope is known to
/// be empty without looking at posts.
async fn resolve(
    store: &dyn DataStore,
    viewer: &Viewer,
    scope: FeedScope,
) -> Result<Option<PostFilter>, AppError> {
    let filter = match scope {
        FeedScope::AllPublished => PostFilter::Published,
        FeedScope::TextFilter(needle) => PostFilter::TitleContains(needle),
        FeedScope::TagFilter(name) => PostFilter::Tagged(name),
        FeedScope::FollowersOfViewer => {
            let ids = store.follower_ids(&viewer.id).await?;
            if ids.is_empty() {
                return Ok(None);
            }
            PostFilter::AuthorsIn(ids)
        }
        FeedScope::FollowingsOfViewer => {
            let ids = store.following_ids(&viewer.id).await?;
            if ids.is_empty() {
                return Ok(None);
            }
            PostFilter::AuthorsIn(ids)
        }
        FeedScope::DraftsOfViewer => PostFilter::DraftsOf(viewer.id.clone()),
        FeedScope::SavedByViewer => PostFilter::SavedBy(viewer.id.clone()),
        FeedScope::AuthoredBy(user_id) => PostFilter::AuthoredBy(user_id),
    };
    Ok(Some(filter))
}

/// One page of a feed, personalised for the viewer.
pub async fn compose_feed(
    store: &dyn DataStore,
    viewer: &Viewer,
    scope: FeedScope,
    page: PageNumber,
) -> Result<Page<ComposedPost>, AppError> {
    let Some(filter) = resolve(store, viewer, scope).await? else {
        return Ok(Page::empty(page));
    };

    let (rows, total) = tokio::try_join!(
        store.find_posts(&filter, page.offset(), PAGE_SIZE),
        store.count_posts(&filter),
    )?;

    let items = compose(store, viewer, rows).await?;
    Ok(Page::new(items, page, total))
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::models::post::PostDraft;
    use crate::models::user::NewUser;
    use crate::store::{Edge, PgStore, counting::CountingStore};

    async fn user(store: &dyn DataStore, name: &str) -> String {
        store
            .create_user(NewUser {
                email: format!("{name}@example.com"),
                password_hash: "x".into(),
                name: name.into(),
            })
            .await
            .unwrap()
            .id
    }

    async fn post(store: &dyn DataStore, author: &str, title: &str, published: bool) -> String {
        store
            .create_post(
                author,
                PostDraft {
                    title: title.into(),
                    content: "body".into(),
                    published,
                    img_url: None,
                    tags: vec!["rust".into()],
                },
            )
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pages_through_published_posts(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = user(&store, "author").await;
        for i in 0..25 {
            post(&store, &author, &format!("post {i}"), true).await;
        }
        post(&store, &author, "hidden", false).await;
        let viewer = Viewer::new(author);

        let first = compose_feed(&store, &viewer, FeedScope::AllPublished, PageNumber::parse(Some("1")))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 25);
        assert_eq!(first.total_page, 3);
        assert_eq!(first.items[0].post.title, "post 24");

        let last = compose_feed(&store, &viewer, FeedScope::AllPublished, PageNumber::parse(Some("3")))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);

        let past_end = compose_feed(&store, &viewer, FeedScope::AllPublished, PageNumber::parse(Some("4")))
            .await
            .unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 25);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn follow_scopes_list_the_right_authors(pool: PgPool) {
        let store = PgStore::new(pool);
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;
        let b_post = post(&store, &b, "from b", true).await;
        let a_post = post(&store, &a, "from a", true).await;

        store
            .insert_edge(&Edge::Follow { follower_id: a.clone(), following_id: b.clone() })
            .await
            .unwrap();

        let as_a = Viewer::new(a.clone());
        let followings = compose_feed(&store, &as_a, FeedScope::FollowingsOfViewer, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(followings.total, 1);
        assert_eq!(followings.items[0].post.id, b_post);
        assert!(followings.items[0].flags.followed_back);

        let as_b = Viewer::new(b);
        let followers = compose_feed(&store, &as_b, FeedScope::FollowersOfViewer, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(followers.total, 1);
        assert_eq!(followers.items[0].post.id, a_post);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn empty_follow_set_skips_post_queries(pool: PgPool) {
        let store = CountingStore::new(PgStore::new(pool));
        let lonely = user(&store, "lonely").await;
        post(&store, &lonely, "mine", true).await;
        store.reset();

        let page = compose_feed(&store, &Viewer::new(lonely), FeedScope::FollowingsOfViewer, PageNumber::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(store.calls(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn saved_feed_follows_save_state(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = user(&store, "author").await;
        let reader = user(&store, "reader").await;
        let first = post(&store, &author, "first", true).await;
        let second = post(&store, &author, "second", true).await;
        let viewer = Viewer::new(reader.clone());

        for id in [&first, &second] {
            store
                .insert_edge(&Edge::Save { user_id: reader.clone(), post_id: id.clone() })
                .await
                .unwrap();
        }
        let saved = compose_feed(&store, &viewer, FeedScope::SavedByViewer, PageNumber::default())
            .await
            .unwrap();
        let ids: Vec<&str> = saved.items.iter().map(|p| p.post.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
        assert!(saved.items.iter().all(|p| p.flags.has_saved));

        store
            .remove_edge(&Edge::Save { user_id: reader.clone(), post_id: second.clone() })
            .await
            .unwrap();
        let saved = compose_feed(&store, &viewer, FeedScope::SavedByViewer, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(saved.total, 1);
        assert_eq!(saved.items[0].post.id, first);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn filters_match_title_and_tag(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = user(&store, "author").await;
        post(&store, &author, "Learning Rust", true).await;
        post(&store, &author, "Gardening", true).await;
        let viewer = Viewer::new(author);

        let by_title = compose_feed(&store, &viewer, FeedScope::text(Some("rUsT".into())).unwrap(), PageNumber::default())
            .await
            .unwrap();
        assert_eq!(by_title.total, 1);

        let by_tag = compose_feed(&store, &viewer, FeedScope::tag(Some("rust".into())).unwrap(), PageNumber::default())
            .await
            .unwrap();
        assert_eq!(by_tag.total, 2);

        assert!(FeedScope::text(None).is_err());
        assert!(FeedScope::tag(Some("  ".into())).is_err());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn drafts_are_private_to_their_author(pool: PgPool) {
        let store = PgStore::new(pool);
        let author = user(&store, "author").await;
        let other = user(&store, "other").await;
        post(&store, &author, "wip", false).await;

        let mine = compose_feed(&store, &Viewer::new(author), FeedScope::DraftsOfViewer, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 1);

        let theirs = compose_feed(&store, &Viewer::new(other), FeedScope::DraftsOfViewer, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(theirs.total, 0);
    }
}

// src/store/postgres.rs

//! PostgreSQL implementation of [`DataStore`] on top of `sqlx`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{DataStore, Edge, PostFilter, StoreError, StoreResult};
use crate::models::{
    comment::{Comment, CommentView},
    notification::{NewNotification, Notification, NotificationKind, NotificationSender, NotificationView},
    post::{PostDraft, PostRecord, TagCount},
    user::{DEFAULT_AVATAR, NewUser, ProfileChanges, User, UserCard, UserDetails, UserSummary},
};

/// Post columns joined with author name/avatar and the tag names.
const POST_SELECT: &str = r#"
    SELECT
        p.id, p.title, p.content, p.published, p.img_url, p.author_id,
        p.created_at, p.updated_at,
        u.name AS author_name,
        pr.image_url AS author_image_url,
        ARRAY(
            SELECT t.name FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = p.id
            ORDER BY t.name
        ) AS tags
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN profiles pr ON pr.user_id = u.id
"#;

const USER_CARD_SELECT: &str = r#"
    SELECT u.id, u.name, COALESCE(pr.bio, '') AS bio, pr.image_url
    FROM users u
    LEFT JOIN profiles pr ON pr.user_id = u.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct PostRow {
    id: String,
    title: String,
    content: String,
    published: bool,
    img_url: Option<String>,
    author_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: String,
    author_image_url: Option<String>,
    tags: Vec<String>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        PostRecord {
            author: UserSummary {
                id: row.author_id.clone(),
                name: row.author_name,
                image_url: row.author_image_url,
            },
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            img_url: row.img_url,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tags: row.tags,
        }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    comment: String,
    created_at: DateTime<Utc>,
    user_id: String,
    user_name: String,
    user_image_url: Option<String>,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        CommentView {
            id: row.id,
            comment: row.comment,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                image_url: row.user_image_url,
            },
        }
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    #[sqlx(rename = "type")]
    kind: String,
    message: String,
    post_id: Option<String>,
    sender_id: String,
    receiver_id: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct NotificationViewRow {
    id: String,
    #[sqlx(rename = "type")]
    kind: String,
    message: String,
    post_id: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
    sender_id: String,
    sender_image_url: Option<String>,
}

fn parse_kind(raw: &str) -> StoreResult<NotificationKind> {
    raw.parse::<NotificationKind>()
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(e.into())))
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> StoreResult<Self> {
        Ok(Notification {
            kind: parse_kind(&row.kind)?,
            id: row.id,
            message: row.message,
            post_id: row.post_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<NotificationViewRow> for NotificationView {
    type Error = StoreError;

    fn try_from(row: NotificationViewRow) -> StoreResult<Self> {
        Ok(NotificationView {
            kind: parse_kind(&row.kind)?,
            id: row.id,
            message: row.message,
            post_id: row.post_id,
            sender: NotificationSender {
                id: row.sender_id,
                image_url: row.sender_image_url,
            },
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Appends the joins and WHERE clause selecting the posts in `filter`.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    match filter {
        PostFilter::Published => {
            qb.push(" WHERE p.published = TRUE");
        }
        PostFilter::TitleContains(needle) => {
            qb.push(" WHERE p.published = TRUE AND p.title ILIKE ");
            qb.push_bind(like_pattern(needle));
        }
        PostFilter::Tagged(name) => {
            qb.push(
                " WHERE p.published = TRUE AND EXISTS (\
                 SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.name = ",
            );
            qb.push_bind(name.clone());
            qb.push(")");
        }
        PostFilter::AuthorsIn(ids) => {
            qb.push(" WHERE p.published = TRUE AND p.author_id = ANY(");
            qb.push_bind(ids.clone());
            qb.push(")");
        }
        PostFilter::AuthoredBy(author_id) => {
            qb.push(" WHERE p.published = TRUE AND p.author_id = ");
            qb.push_bind(author_id.clone());
        }
        PostFilter::DraftsOf(author_id) => {
            qb.push(" WHERE p.published = FALSE AND p.author_id = ");
            qb.push_bind(author_id.clone());
        }
        PostFilter::SavedBy(user_id) => {
            qb.push(" JOIN saved_posts sp ON sp.post_id = p.id WHERE sp.user_id = ");
            qb.push_bind(user_id.clone());
            // A saved post that went back to draft stays hidden from everyone but its author.
            qb.push(" AND (p.published = TRUE OR p.author_id = ");
            qb.push_bind(user_id.clone());
            qb.push(")");
        }
    }
}

fn order_clause(filter: &PostFilter) -> &'static str {
    match filter {
        PostFilter::DraftsOf(_) => " ORDER BY p.updated_at DESC, p.id DESC",
        PostFilter::SavedBy(_) => " ORDER BY sp.created_at DESC, p.id DESC",
        _ => " ORDER BY p.created_at DESC, p.id DESC",
    }
}

/// Table and key columns backing an edge, plus the two key values.
fn edge_parts(edge: &Edge) -> (&'static str, &'static str, &'static str, &str, &str) {
    match edge {
        Edge::Like { user_id, post_id } => ("likes", "user_id", "post_id", user_id, post_id),
        Edge::Save { user_id, post_id } => ("saved_posts", "user_id", "post_id", user_id, post_id),
        Edge::Follow {
            follower_id,
            following_id,
        } => ("follows", "follower_id", "following_id", follower_id, following_id),
    }
}

/// Upserts each tag by name and links it to the post.
async fn attach_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: &str,
    tags: &[String],
) -> StoreResult<()> {
    for name in tags {
        let tag_id: String = sqlx::query_scalar(
            r#"
            INSERT INTO tags (id, name) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(post_id)
            .bind(&tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

fn into_count_map(rows: Vec<(String, i64)>) -> HashMap<String, i64> {
    rows.into_iter().collect()
}

#[async_trait]
impl DataStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4().to_string();

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password, name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password, name, created_at
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO profiles (user_id, bio, image_url) VALUES ($1, '', $2)")
            .bind(&id)
            .bind(DEFAULT_AVATAR)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_summary(&self, id: &str) -> StoreResult<Option<UserSummary>> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, pr.image_url
            FROM users u
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_details(&self, id: &str) -> StoreResult<Option<UserDetails>> {
        let user = sqlx::query_as::<_, UserDetails>(
            r#"
            SELECT u.id, u.name, u.created_at,
                   COALESCE(pr.bio, '') AS bio, pr.long_bio, pr.image_url
            FROM users u
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_profile(&self, user_id: &str, changes: ProfileChanges) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET name = COALESCE($2, name) WHERE id = $1")
            .bind(user_id)
            .bind(changes.name)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE profiles
            SET bio = COALESCE($2, bio),
                long_bio = COALESCE($3, long_bio),
                image_url = COALESCE($4, image_url)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(changes.bio)
        .bind(changes.long_bio)
        .bind(changes.image_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn search_users(
        &self,
        name: &str,
        exclude: &str,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<UserCard>> {
        let users = sqlx::query_as::<_, UserCard>(&format!(
            "{} WHERE u.id <> $1 AND u.name ILIKE $2 ORDER BY u.name DESC, u.id DESC LIMIT $3 OFFSET $4",
            USER_CARD_SELECT
        ))
        .bind(exclude)
        .bind(like_pattern(name))
        .bind(take)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count_users_matching(&self, name: &str, exclude: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id <> $1 AND name ILIKE $2")
            .bind(exclude)
            .bind(like_pattern(name))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn newest_users(&self, exclude: &str, take: i64) -> StoreResult<Vec<UserCard>> {
        let users = sqlx::query_as::<_, UserCard>(&format!(
            "{} WHERE u.id <> $1 ORDER BY u.created_at DESC, u.id DESC LIMIT $2",
            USER_CARD_SELECT
        ))
        .bind(exclude)
        .bind(take)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn follower_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar("SELECT follower_id FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn following_ids(&self, user_id: &str) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar("SELECT following_id FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn list_followers(&self, user_id: &str, take: Option<i64>) -> StoreResult<Vec<UserCard>> {
        let users = sqlx::query_as::<_, UserCard>(
            r#"
            SELECT u.id, u.name, COALESCE(pr.bio, '') AS bio, pr.image_url
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(take)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_followings(&self, user_id: &str) -> StoreResult<Vec<UserCard>> {
        let users = sqlx::query_as::<_, UserCard>(
            r#"
            SELECT u.id, u.name, COALESCE(pr.bio, '') AS bio, pr.image_url
            FROM follows f
            JOIN users u ON u.id = f.following_id
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count_followers(&self, user_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_followings(&self, user_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn followed_among(
        &self,
        follower_id: &str,
        candidates: &[String],
    ) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar(
            "SELECT following_id FROM follows WHERE follower_id = $1 AND following_id = ANY($2)",
        )
        .bind(follower_id)
        .bind(candidates.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn group_count_followers(&self, user_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT following_id, COUNT(*)
            FROM follows
            WHERE following_id = ANY($1)
            GROUP BY following_id
            "#,
        )
        .bind(user_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_count_map(rows))
    }

    async fn create_post(&self, author_id: &str, draft: PostDraft) -> StoreResult<String> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, published, img_url, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.published)
        .bind(&draft.img_url)
        .bind(author_id)
        .execute(&mut *tx)
        .await?;

        attach_tags(&mut tx, &id, &draft.tags).await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update_post(&self, id: &str, author_id: &str, draft: PostDraft) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $3, content = $4, published = $5, img_url = $6, updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.published)
        .bind(&draft.img_url)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, id, &draft.tags).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_post(&self, id: &str, author_id: &str) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn find_post(&self, id: &str) -> StoreResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PostRecord::from))
    }

    async fn find_posts(
        &self,
        filter: &PostFilter,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<PostRecord>> {
        let mut qb = QueryBuilder::<Postgres>::new(POST_SELECT);
        push_scope(&mut qb, filter);
        qb.push(order_clause(filter));
        qb.push(" LIMIT ");
        qb.push_bind(take);
        qb.push(" OFFSET ");
        qb.push_bind(skip);

        let rows: Vec<PostRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_scope(&mut qb, filter);
        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn trending_tags(&self, take: i64) -> StoreResult<Vec<TagCount>> {
        let tags = sqlx::query_as::<_, TagCount>(
            r#"
            SELECT t.id, t.name, COUNT(pt.post_id) AS post_count
            FROM tags t
            LEFT JOIN post_tags pt ON pt.tag_id = t.id
            GROUP BY t.id, t.name
            ORDER BY post_count DESC, t.name ASC
            LIMIT $1
            "#,
        )
        .bind(take)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    async fn group_count_likes(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT post_id, COUNT(*) FROM likes WHERE post_id = ANY($1) GROUP BY post_id",
        )
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_count_map(rows))
    }

    async fn group_count_comments(&self, post_ids: &[String]) -> StoreResult<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT post_id, COUNT(*) FROM comments WHERE post_id = ANY($1) GROUP BY post_id",
        )
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_count_map(rows))
    }

    async fn liked_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar("SELECT post_id FROM likes WHERE user_id = $1 AND post_id = ANY($2)")
            .bind(user_id)
            .bind(post_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn saved_among(&self, user_id: &str, post_ids: &[String]) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar(
            "SELECT post_id FROM saved_posts WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(post_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn insert_edge(&self, edge: &Edge) -> StoreResult<bool> {
        let (table, a_col, b_col, a, b) = edge_parts(edge);
        let inserted = sqlx::query(&format!(
            "INSERT INTO {table} ({a_col}, {b_col}) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        ))
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(inserted > 0)
    }

    async fn remove_edge(&self, edge: &Edge) -> StoreResult<bool> {
        let (table, a_col, b_col, a, b) = edge_parts(edge);
        let deleted = sqlx::query(&format!(
            "DELETE FROM {table} WHERE {a_col} = $1 AND {b_col} = $2"
        ))
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(deleted > 0)
    }

    async fn create_comment(&self, post_id: &str, user_id: &str, text: &str) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, comment, post_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, comment, post_id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(text)
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn find_comments(
        &self,
        post_id: &str,
        skip: i64,
        take: i64,
    ) -> StoreResult<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.comment, c.created_at,
                   u.id AS user_id, u.name AS user_name, pr.image_url AS user_image_url
            FROM comments c
            JOIN users u ON u.id = c.user_id
            LEFT JOIN profiles pr ON pr.user_id = u.id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(take)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CommentView::from).collect())
    }

    async fn count_comments(&self, post_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_notification(&self, notification: NewNotification) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, type, message, post_id, sender_id, receiver_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, type, message, post_id, sender_id, receiver_id, is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(notification.kind.as_str())
        .bind(&notification.message)
        .bind(&notification.post_id)
        .bind(&notification.sender_id)
        .bind(&notification.receiver_id)
        .fetch_one(&self.pool)
        .await?;
        Notification::try_from(row)
    }

    async fn unread_notifications(&self, receiver_id: &str) -> StoreResult<Vec<NotificationView>> {
        let rows = sqlx::query_as::<_, NotificationViewRow>(
            r#"
            SELECT n.id, n.type, n.message, n.post_id, n.is_read, n.created_at,
                   n.sender_id, pr.image_url AS sender_image_url
            FROM notifications n
            LEFT JOIN profiles pr ON pr.user_id = n.sender_id
            WHERE n.receiver_id = $1 AND n.is_read = FALSE
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(NotificationView::try_from).collect()
    }

    async fn count_unread_notifications(&self, receiver_id: &str) -> StoreResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn mark_notification_read(&self, id: &str, receiver_id: &str) -> StoreResult<bool> {
        let matched = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND receiver_id = $2",
        )
        .bind(id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(matched > 0)
    }

    async fn mark_all_notifications_read(&self, receiver_id: &str) -> StoreResult<u64> {
        let updated = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(updated)
    }
}

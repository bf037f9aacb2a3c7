use crate::models::Post;
use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

/// Full-form update applied to an existing post.
///
/// `group_id` is written as given: `None` clears the group, matching a form
/// submission that omits the field. `image_key` is the opposite: `None`
/// keeps whatever key is stored, `Some` replaces it.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

/// Repository for post records.
///
/// Feed queries come in count/page pairs per scope; every page is ordered by
/// `created_at DESC`. The follow-scoped pair joins through the follows
/// relation.
#[async_trait::async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, new_post: NewPost) -> Result<Post>;

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Resolve a post addressed as (author username, post id); both must match
    async fn find_by_author_username_and_id(
        &self,
        username: &str,
        post_id: Uuid,
    ) -> Result<Option<Post>>;

    /// Apply a full-form update; `created_at` and `author_id` never change.
    /// Returns the updated post, or None when the id is unknown.
    async fn update(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    async fn page_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;
    async fn count_all(&self) -> Result<i64>;

    async fn page_by_group(&self, group_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>>;
    async fn count_by_group(&self, group_id: Uuid) -> Result<i64>;

    async fn page_by_author(&self, author_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>>;
    async fn count_by_author(&self, author_id: Uuid) -> Result<i64>;

    /// Posts whose author is followed by `user_id`
    async fn page_followed_by(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>>;
    async fn count_followed_by(&self, user_id: Uuid) -> Result<i64>;
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, author_id, text, group_id, image_key, created_at";

#[async_trait::async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, text, group_id, image_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, text, group_id, image_key, created_at
            "#,
        )
        .bind(new_post.author_id)
        .bind(&new_post.text)
        .bind(new_post.group_id)
        .bind(&new_post.image_key)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up post by id")?;

        Ok(post)
    }

    async fn find_by_author_username_and_id(
        &self,
        username: &str,
        post_id: Uuid,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.author_id, p.text, p.group_id, p.image_key, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1 AND u.username = $2
            "#,
        )
        .bind(post_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up post by author and id")?;

        Ok(post)
    }

    async fn update(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1,
                group_id = $2,
                image_key = COALESCE($3, image_key)
            WHERE id = $4
            RETURNING id, author_id, text, group_id, image_key, created_at
            "#,
        )
        .bind(&changes.text)
        .bind(changes.group_id)
        .bind(&changes.image_key)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update post")?;

        Ok(post)
    }

    async fn page_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to page posts")?;

        Ok(posts)
    }

    async fn count_all(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts")?;

        Ok(count)
    }

    async fn page_by_group(&self, group_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE group_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to page group posts")?;

        Ok(posts)
    }

    async fn count_by_group(&self, group_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count group posts")?;

        Ok(count)
    }

    async fn page_by_author(&self, author_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to page author posts")?;

        Ok(posts)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count author posts")?;

        Ok(count)
    }

    async fn page_followed_by(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.author_id, p.text, p.group_id, p.image_key, p.created_at
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to page followed posts")?;

        Ok(posts)
    }

    async fn count_followed_by(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count followed posts")?;

        Ok(count)
    }
}

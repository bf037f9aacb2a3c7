use crate::models::Comment;
use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for comment records.
#[async_trait::async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment>;

    /// All comments on a post, newest first
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;
}

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, author_id, text, created_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, text, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        Ok(comments)
    }
}

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the follow relation.
///
/// The relation is a two-state toggle per (user, author) pair. Inserts and
/// deletes are idempotent: a concurrent duplicate insert lands on the unique
/// constraint and reports `false` instead of creating a second row.
#[async_trait::async_trait]
pub trait FollowRepository: Send + Sync {
    /// Idempotent create; returns true if a new row was inserted
    async fn insert(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Idempotent delete; returns true if a row was removed
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Does `user_id` follow `author_id`?
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;
}

/// PostgreSQL-backed follow repository
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FollowRepository for PgFollowRepository {
    async fn insert(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (user_id, author_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, author_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to insert follow")?;

        Ok(inserted.is_some())
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE user_id = $1 AND author_id = $2
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .context("Failed to delete follow")?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let (found,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check follow existence")?;

        Ok(found)
    }
}

use crate::models::User;
use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user records.
///
/// Users originate in the external identity provider; this service mirrors
/// `{id, username}` pairs from validated token claims so that foreign keys
/// have a target.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or refresh a mirrored user
    async fn upsert(&self, user_id: Uuid, username: &str) -> Result<()>;

    /// Look up a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user by id
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, user_id: Uuid, username: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            "#,
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.pool)
        .await
        .context("Failed to upsert user")?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up user by username")?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up user by id")?;

        Ok(user)
    }
}

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

/// Ensure the relational schema exists.
///
/// Tables are created lazily at service startup to unblock environments where
/// migrations have not been applied yet (fresh developer machines or CI
/// spins). Every statement is idempotent.
///
/// Referential integrity encodes the ownership rules:
/// - deleting a user removes their posts, comments, and follows both ways
/// - deleting a group detaches its posts (`SET NULL`), the posts survive
/// - deleting a post removes its comments
/// - the (user_id, author_id) follow pair is unique; concurrent duplicate
///   inserts resolve at this constraint
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring blog schema exists");

    for statement in [
        USERS_TABLE,
        GROUPS_TABLE,
        POSTS_TABLE,
        COMMENTS_TABLE,
        FOLLOWS_TABLE,
        POSTS_CREATED_AT_INDEX,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply schema statement")?;
    }

    Ok(())
}

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    display_name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const GROUPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS groups (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
)
"#;

const POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    group_id UUID REFERENCES groups(id) ON DELETE SET NULL,
    image_key TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const COMMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const FOLLOWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS follows (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (user_id, author_id)
)
"#;

const POSTS_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at DESC)
"#;

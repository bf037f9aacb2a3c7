use crate::models::Group;
use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new group
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Repository for group records.
///
/// Groups are administered out-of-band; the request path only ever reads
/// them. `create` exists for provisioning tooling and the test suites.
#[async_trait::async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, new_group: NewGroup) -> Result<Group>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>>;

    async fn find_by_id(&self, group_id: Uuid) -> Result<Option<Group>>;

    /// All groups, ordered by title; used to populate the post form
    async fn list_all(&self) -> Result<Vec<Group>>;
}

/// PostgreSQL-backed group repository
#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, new_group: NewGroup) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&new_group.title)
        .bind(&new_group.slug)
        .bind(&new_group.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create group")?;

        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up group by slug")?;

        Ok(group)
    }

    async fn find_by_id(&self, group_id: Uuid) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up group by id")?;

        Ok(group)
    }

    async fn list_all(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list groups")?;

        Ok(groups)
    }
}

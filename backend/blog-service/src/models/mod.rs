/// Data models for blog-service
///
/// This module defines the persistent entities:
/// - User: authors mirrored from the external identity provider
/// - Group: named collections of posts addressed by slug
/// - Post: authored entries, optionally grouped, optionally illustrated
/// - Comment: replies attached to a post
/// - Follow: directed "reader follows author" relation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - authors and readers known to this service
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Group entity - a titled collection of posts with a unique slug
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Post entity - an authored entry in the feed
///
/// `created_at` is set once at insertion and never updated; feeds order by it
/// descending.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<Uuid>,
    /// Opaque reference into the external image store
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment entity - a reply attached to a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Follow entity - `user_id` receives `author_id`'s posts in their feed
///
/// The (user_id, author_id) pair is unique at the database level. Nothing in
/// the schema forbids user_id == author_id; that case is refused by the
/// authorization policy instead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database access layer
///
/// This module provides:
/// - Idempotent schema bootstrap run at service startup
/// - Repository traits over users, groups, posts, comments, and follows
/// - PostgreSQL implementations of those traits
///
/// Handlers and services depend only on the traits; the concrete
/// implementations are chosen at startup (Postgres in production, in-memory
/// doubles in the test suites).
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod schema;
pub mod user_repo;

pub use comment_repo::{CommentRepository, PgCommentRepository};
pub use follow_repo::{FollowRepository, PgFollowRepository};
pub use group_repo::{GroupRepository, NewGroup, PgGroupRepository};
pub use post_repo::{NewPost, PgPostRepository, PostChanges, PostRepository};
pub use schema::ensure_schema;
pub use user_repo::{PgUserRepository, UserRepository};

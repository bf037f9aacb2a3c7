/// Business logic layer for blog-service
///
/// This module provides:
/// - Feed composer: scope + page -> ordered, paginated post sequence
/// - Authorization policy: may this viewer edit/follow?
/// - Post, comment, and follow services wrapping the repositories
pub mod comments;
pub mod feed;
pub mod follow;
pub mod pagination;
pub mod policy;
pub mod posts;

// Re-export commonly used services
pub use comments::{CommentOutcome, CommentService};
pub use feed::{FeedPage, FeedScope, FeedService};
pub use follow::{FollowOutcome, FollowService};
pub use pagination::PageRequest;
pub use policy::AuthorizationPolicy;
pub use posts::{EditOutcome, PostInput, PostService};

//! Authorization policy
//!
//! Pure decision logic over (viewer, resource) pairs. No method here mutates
//! anything; the follow checks read the store and nothing else.
use crate::db::FollowRepository;
use crate::models::Post;
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// May `viewer_id` mutate this post? Only its author may.
///
/// Handlers answer a failed check with a redirect to the author's profile
/// rather than an error page.
pub fn can_edit(viewer_id: Uuid, post: &Post) -> bool {
    post.author_id == viewer_id
}

/// Follow-relation decisions backed by the follow repository
#[derive(Clone)]
pub struct AuthorizationPolicy {
    follows: Arc<dyn FollowRepository>,
}

impl AuthorizationPolicy {
    pub fn new(follows: Arc<dyn FollowRepository>) -> Self {
        Self { follows }
    }

    /// Does `viewer_id` currently follow `author_id`?
    pub async fn is_following(&self, viewer_id: Uuid, author_id: Uuid) -> Result<bool> {
        self.follows.exists(viewer_id, author_id).await
    }

    /// May `viewer_id` create a follow of `author_id`?
    ///
    /// False when the viewer is the author (no self-follow) or when the
    /// relation already exists. The self-follow rule lives only here; the
    /// schema does not enforce it.
    pub async fn can_follow(&self, viewer_id: Uuid, author_id: Uuid) -> Result<bool> {
        if viewer_id == author_id {
            return Ok(false);
        }
        Ok(!self.follows.exists(viewer_id, author_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            text: "g".to_string(),
            group_id: None,
            image_key: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_author_can_edit_own_post() {
        let author = Uuid::new_v4();
        assert!(can_edit(author, &post_by(author)));
    }

    #[test]
    fn test_non_author_cannot_edit() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert!(!can_edit(stranger, &post_by(author)));
    }
}

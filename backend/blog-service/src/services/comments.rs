//! Comment service
use crate::auth::Identity;
use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::Comment;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Result of a comment submission
#[derive(Debug)]
pub enum CommentOutcome {
    Created(Comment),
    /// Blank text: no record is written and the caller redirects back to the
    /// post as if nothing happened, matching the forgiving comment form.
    Rejected,
}

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// Attach a comment from the authenticated caller to the post addressed
    /// as (author username, post id).
    pub async fn add_comment(
        &self,
        viewer: &Identity,
        username: &str,
        post_id: Uuid,
        text: &str,
    ) -> Result<CommentOutcome> {
        let post = self
            .posts
            .find_by_author_username_and_id(username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by '{username}'")))?;

        if text.trim().is_empty() {
            return Ok(CommentOutcome::Rejected);
        }

        self.users.upsert(viewer.id, &viewer.username).await?;
        let comment = self.comments.create(post.id, viewer.id, text).await?;

        info!(post_id = %post.id, comment_id = %comment.id, "Comment added");
        Ok(CommentOutcome::Created(comment))
    }

    /// All comments on a post, newest first
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        Ok(self.comments.list_by_post(post_id).await?)
    }
}

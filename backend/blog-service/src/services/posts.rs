//! Post service - creation and author-only editing
use crate::auth::Identity;
use crate::db::{GroupRepository, NewPost, PostChanges, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::services::policy;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Form payload for creating or editing a post.
///
/// Edits are full-form: an absent `group_id` clears the group, an absent
/// `image_key` keeps the stored image.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

/// Result of an edit attempt
#[derive(Debug)]
pub enum EditOutcome {
    Updated(Post),
    /// Viewer is not the author; nothing was changed. The handler redirects
    /// to the author's profile.
    NotAuthor,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
        }
    }

    async fn validate(&self, input: &PostInput) -> Result<()> {
        if input.text.trim().is_empty() {
            return Err(AppError::Validation("text must not be empty".to_string()));
        }
        if let Some(group_id) = input.group_id {
            if self.groups.find_by_id(group_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "group {group_id} does not exist"
                )));
            }
        }
        Ok(())
    }

    /// Create a post owned by the authenticated caller.
    pub async fn create_post(&self, author: &Identity, input: PostInput) -> Result<Post> {
        self.validate(&input).await?;

        // Mirror the identity before taking a foreign key on it
        self.users.upsert(author.id, &author.username).await?;

        let post = self
            .posts
            .create(NewPost {
                author_id: author.id,
                text: input.text,
                group_id: input.group_id,
                image_key: input.image_key,
            })
            .await?;

        info!(post_id = %post.id, author = %author.username, "Post created");
        Ok(post)
    }

    /// Resolve a post addressed as (author username, id), or NotFound.
    pub async fn resolve(&self, username: &str, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_by_author_username_and_id(username, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} by '{username}'")))
    }

    /// Apply a full-form edit if the viewer is the author.
    ///
    /// A non-author viewer gets `NotAuthor` back with the record untouched;
    /// invalid input fails validation before anything is written.
    pub async fn edit_post(
        &self,
        viewer: &Identity,
        username: &str,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<EditOutcome> {
        let post = self.resolve(username, post_id).await?;

        if !policy::can_edit(viewer.id, &post) {
            return Ok(EditOutcome::NotAuthor);
        }

        self.validate(&input).await?;

        let updated = self
            .posts
            .update(
                post.id,
                PostChanges {
                    text: input.text,
                    group_id: input.group_id,
                    image_key: input.image_key,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        info!(post_id = %post.id, author = %viewer.username, "Post updated");
        Ok(EditOutcome::Updated(updated))
    }
}

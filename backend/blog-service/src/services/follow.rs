//! Follow service - the two-state toggle between a reader and an author
use crate::auth::Identity;
use crate::db::{FollowRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::policy::AuthorizationPolicy;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a follow attempt
#[derive(Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    /// Already following, self-follow, or lost a duplicate race: nothing
    /// changed and the caller treats it as success.
    NoOp,
}

pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
    policy: AuthorizationPolicy,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        let policy = AuthorizationPolicy::new(follows.clone());
        Self {
            follows,
            users,
            policy,
        }
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    async fn resolve_author(&self, username: &str) -> Result<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{username}'")))
    }

    /// Start following `username`.
    pub async fn follow(&self, viewer: &Identity, username: &str) -> Result<FollowOutcome> {
        let author = self.resolve_author(username).await?;

        if !self.policy.can_follow(viewer.id, author.id).await? {
            debug!(viewer = %viewer.username, author = %username, "Follow refused, no-op");
            return Ok(FollowOutcome::NoOp);
        }

        self.users.upsert(viewer.id, &viewer.username).await?;

        // A concurrent duplicate lands on the unique pair constraint and
        // reports false; that race is a no-op, not an error.
        if self.follows.insert(viewer.id, author.id).await? {
            info!(viewer = %viewer.username, author = %username, "Follow created");
            Ok(FollowOutcome::Created)
        } else {
            Ok(FollowOutcome::NoOp)
        }
    }

    /// Stop following `username`; NotFound when no relation exists.
    pub async fn unfollow(&self, viewer: &Identity, username: &str) -> Result<()> {
        let author = self.resolve_author(username).await?;

        if !self.follows.delete(viewer.id, author.id).await? {
            return Err(AppError::NotFound(format!(
                "follow of '{username}' by '{}'",
                viewer.username
            )));
        }

        info!(viewer = %viewer.username, author = %username, "Follow removed");
        Ok(())
    }
}

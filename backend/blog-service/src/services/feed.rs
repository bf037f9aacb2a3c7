//! Feed composer
//!
//! Turns a scope plus a page request into an ordered, paginated slice of
//! posts. Every scope orders by creation time descending and uses the same
//! fixed page size; pages past the end are empty, never errors.
use crate::db::{GroupRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Group, Post, User};
use crate::services::pagination::{has_more, PageRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Which posts populate the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post
    All,
    /// Posts in the group with this slug
    ByGroup(String),
    /// Posts authored by this username
    ByAuthor(String),
    /// Posts whose author is followed by this user
    FollowedBy(Uuid),
}

impl FeedScope {
    /// Metrics label for the scope
    pub fn label(&self) -> &'static str {
        match self {
            FeedScope::All => "all",
            FeedScope::ByGroup(_) => "group",
            FeedScope::ByAuthor(_) => "author",
            FeedScope::FollowedBy(_) => "followed",
        }
    }
}

/// One composed page of a feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub items: Vec<Post>,
    pub total_count: i64,
    pub has_more: bool,
    pub page_number: i64,
}

/// Resolved context a feed page was composed against; lets handlers reuse
/// the lookups compose already performed (group header, profile author).
#[derive(Debug, Clone, Default)]
pub struct FeedContext {
    pub group: Option<Group>,
    pub author: Option<User>,
}

pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl FeedService {
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

    /// Compose one page of the feed selected by `scope`.
    ///
    /// Unknown group slugs and usernames are NotFound; a follow scope with
    /// zero follows composes an empty page.
    pub async fn compose(&self, scope: FeedScope, page: PageRequest) -> Result<(FeedPage, FeedContext)> {
        let mut context = FeedContext::default();
        let (limit, offset) = (page.limit(), page.offset());

        let (items, total_count) = match &scope {
            FeedScope::All => {
                let total = self.posts.count_all().await?;
                let items = self.posts.page_all(limit, offset).await?;
                (items, total)
            }
            FeedScope::ByGroup(slug) => {
                let group = self
                    .groups
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("group '{slug}'")))?;
                let total = self.posts.count_by_group(group.id).await?;
                let items = self.posts.page_by_group(group.id, limit, offset).await?;
                context.group = Some(group);
                (items, total)
            }
            FeedScope::ByAuthor(username) => {
                let author = self
                    .users
                    .find_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("user '{username}'")))?;
                let total = self.posts.count_by_author(author.id).await?;
                let items = self.posts.page_by_author(author.id, limit, offset).await?;
                context.author = Some(author);
                (items, total)
            }
            FeedScope::FollowedBy(user_id) => {
                let total = self.posts.count_followed_by(*user_id).await?;
                let items = self.posts.page_followed_by(*user_id, limit, offset).await?;
                (items, total)
            }
        };

        debug!(
            scope = scope.label(),
            page = page.number,
            total_count,
            returned = items.len(),
            "Composed feed page"
        );

        let page = FeedPage {
            has_more: has_more(offset, limit, total_count),
            total_count,
            items,
            page_number: page.number,
        };

        Ok((page, context))
    }
}

//! Shared test support: an in-memory implementation of every repository
//! trait, plus fixtures for configuration, state, and identity tokens.
//!
//! The store hands out deterministic, strictly increasing `created_at`
//! timestamps so that descending-time ordering is stable in assertions.
use anyhow::{bail, Result};
use blog_service::auth::{encode_token, Identity};
use blog_service::config::{AppConfig, AuthConfig, Config, CorsConfig, DatabaseConfig, FeedConfig};
use blog_service::db::{
    CommentRepository, FollowRepository, GroupRepository, NewGroup, NewPost, PostChanges,
    PostRepository, UserRepository,
};
use blog_service::handlers::AppState;
use blog_service::models::{Comment, Follow, Group, Post, User};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
    ticks: i64,
}

impl Inner {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        self.ticks += 1;
        base + Duration::seconds(self.ticks)
    }

    fn username_of(&self, user_id: Uuid) -> Option<String> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
    }
}

/// In-memory store implementing all repository traits
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn post_count(&self) -> usize {
        self.inner.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.inner.lock().unwrap().comments.len()
    }

    pub fn follow_count(&self) -> usize {
        self.inner.lock().unwrap().follows.len()
    }

    pub fn get_post(&self, post_id: Uuid) -> Option<Post> {
        self.inner
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }
}

fn page<T>(mut items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = offset.max(0) as usize;
    let limit = limit.max(0) as usize;
    if offset >= items.len() {
        return Vec::new();
    }
    items.split_off(offset).into_iter().take(limit).collect()
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn upsert(&self, user_id: Uuid, username: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.iter_mut().find(|u| u.id == user_id) {
            user.username = username.to_string();
            return Ok(());
        }
        let created_at = inner.next_timestamp();
        inner.users.push(User {
            id: user_id,
            username: username.to_string(),
            display_name: None,
            created_at,
        });
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == user_id).cloned())
    }
}

#[async_trait::async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, new_group: NewGroup) -> Result<Group> {
        let mut inner = self.inner.lock().unwrap();
        if inner.groups.iter().any(|g| g.slug == new_group.slug) {
            bail!("duplicate group slug '{}'", new_group.slug);
        }
        let group = Group {
            id: Uuid::new_v4(),
            title: new_group.title,
            slug: new_group.slug,
            description: new_group.description,
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_id(&self, group_id: Uuid) -> Result<Option<Group>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>> {
        let inner = self.inner.lock().unwrap();
        let mut groups = inner.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait::async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_timestamp();
        let post = Post {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            text: new_post.text,
            group_id: new_post.group_id,
            image_key: new_post.image_key,
            created_at,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn find_by_author_username_and_id(
        &self,
        username: &str,
        post_id: Uuid,
    ) -> Result<Option<Post>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .find(|p| {
                p.id == post_id && inner.username_of(p.author_id).as_deref() == Some(username)
            })
            .cloned())
    }

    async fn update(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(post) = inner.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };
        post.text = changes.text;
        post.group_id = changes.group_id;
        if let Some(image_key) = changes.image_key {
            post.image_key = Some(image_key);
        }
        Ok(Some(post.clone()))
    }

    async fn page_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        Ok(page(newest_first(inner.posts.clone()), limit, offset))
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.inner.lock().unwrap().posts.len() as i64)
    }

    async fn page_by_group(&self, group_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        let posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| p.group_id == Some(group_id))
            .cloned()
            .collect();
        Ok(page(newest_first(posts), limit, offset))
    }

    async fn count_by_group(&self, group_id: Uuid) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.group_id == Some(group_id))
            .count() as i64)
    }

    async fn page_by_author(&self, author_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        let posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(page(newest_first(posts), limit, offset))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as i64)
    }

    async fn page_followed_by(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let inner = self.inner.lock().unwrap();
        let followed: Vec<Uuid> = inner
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect();
        let posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| followed.contains(&p.author_id))
            .cloned()
            .collect();
        Ok(page(newest_first(posts), limit, offset))
    }

    async fn count_followed_by(&self, user_id: Uuid) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        let followed: Vec<Uuid> = inner
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect();
        Ok(inner
            .posts
            .iter()
            .filter(|p| followed.contains(&p.author_id))
            .count() as i64)
    }
}

#[async_trait::async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        let mut inner = self.inner.lock().unwrap();
        let created_at = inner.next_timestamp();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text: text.to_string(),
            created_at,
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait::async_trait]
impl FollowRepository for MemoryStore {
    async fn insert(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
        {
            return Ok(false);
        }
        let created_at = inner.next_timestamp();
        inner.follows.push(Follow {
            id: Uuid::new_v4(),
            user_id,
            author_id,
            created_at,
        });
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.follows.len();
        inner
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(inner.follows.len() < before)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }
}

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_string(),
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            login_url: "/auth/login/".to_string(),
        },
        feed: FeedConfig { page_size: 10 },
    }
}

pub fn test_state() -> (Arc<MemoryStore>, AppState) {
    let store = MemoryStore::new();
    let state = AppState {
        config: test_config(),
        users: store.clone(),
        groups: store.clone(),
        posts: store.clone(),
        comments: store.clone(),
        follows: store.clone(),
    };
    (store, state)
}

/// Register a user in the store and hand back their identity
pub async fn seed_user(store: &Arc<MemoryStore>, username: &str) -> Identity {
    let id = Uuid::new_v4();
    UserRepository::upsert(store.as_ref(), id, username)
        .await
        .unwrap();
    Identity {
        id,
        username: username.to_string(),
    }
}

/// Seed `count` posts for the author, oldest first
pub async fn seed_posts(store: &Arc<MemoryStore>, author: &Identity, count: usize) -> Vec<Post> {
    let mut posts = Vec::with_capacity(count);
    for i in 0..count {
        let post = PostRepository::create(
            store.as_ref(),
            NewPost {
                author_id: author.id,
                text: format!("post {i}"),
                group_id: None,
                image_key: None,
            },
        )
        .await
        .unwrap();
        posts.push(post);
    }
    posts
}

pub fn bearer_for(identity: &Identity) -> String {
    let token = encode_token(identity.id, &identity.username, TEST_SECRET, 3600).unwrap();
    format!("Bearer {token}")
}

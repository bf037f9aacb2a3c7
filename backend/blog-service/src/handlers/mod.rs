/// HTTP handlers for blog-service
///
/// Handlers resolve the caller's identity, consult the authorization policy,
/// ask the feed composer or repositories for data, and answer with a JSON
/// document or a redirect. Mutations by anonymous callers never reach the
/// store: they are redirected to the login page with a `next` parameter.
pub mod comments;
pub mod feed;
pub mod posts;
pub mod profile;

use crate::config::Config;
use crate::db::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use crate::services::{CommentService, FeedService, FollowService, PostService};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

/// Shared application state: configuration plus the repository set.
///
/// Repositories are trait objects so the test suites can swap in in-memory
/// doubles; services are constructed per request the way the teacher of this
/// codebase would construct them, cheap clones of `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl AppState {
    pub fn feed_service(&self) -> FeedService {
        FeedService::new(
            self.posts.clone(),
            self.groups.clone(),
            self.users.clone(),
        )
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(
            self.posts.clone(),
            self.groups.clone(),
            self.users.clone(),
        )
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(
            self.comments.clone(),
            self.posts.clone(),
            self.users.clone(),
        )
    }

    pub fn follow_service(&self) -> FollowService {
        FollowService::new(self.follows.clone(), self.users.clone())
    }
}

/// `?page=` query parameter; parsing is forgiving, see services::pagination
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 302 to `location`
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// 302 to the login page with `next` pointing back at the original path
pub fn login_redirect(config: &Config, next: &str) -> HttpResponse {
    let target = format!(
        "{}?next={}",
        config.auth.login_url,
        urlencoding::encode(next)
    );
    redirect(&target)
}

pub fn profile_url(username: &str) -> String {
    format!("/{username}/")
}

pub fn post_url(username: &str, post_id: uuid::Uuid) -> String {
    format!("/{username}/{post_id}/")
}

/// Register the route tree.
///
/// Fixed-prefix routes come first; the `/{username}/...` patterns match
/// anything, so they go last. The post-detail route accepts POST as a
/// comment submission, a routing decision inherited from the original
/// application and kept alongside the dedicated `/comment/` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(feed::index)))
        .service(web::resource("/group/{slug}/").route(web::get().to(feed::group_posts)))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(web::resource("/follow/").route(web::get().to(feed::follow_index)))
        .service(web::resource("/{username}/follow/").route(web::get().to(profile::follow)))
        .service(web::resource("/{username}/unfollow/").route(web::get().to(profile::unfollow)))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit)),
        )
        .service(
            web::resource("/{username}/{post_id}/comment/")
                .route(web::post().to(comments::add_comment)),
        )
        .service(
            web::resource("/{username}/{post_id}/")
                .route(web::get().to(posts::detail))
                .route(web::post().to(comments::add_comment)),
        )
        .service(web::resource("/{username}/").route(web::get().to(profile::profile)));
}

/// Profile handlers - an author's feed and the follow toggle
use crate::error::Result;
use crate::handlers::{login_redirect, profile_url, redirect, AppState, PageQuery};
use crate::metrics::FEED_REQUEST_TOTAL;
use crate::middleware::MaybeIdentity;
use crate::services::{FeedScope, PageRequest};
use actix_web::{web, HttpResponse};

/// Author profile: their posts plus whether the caller follows them
/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = username.into_inner();

    let scope = FeedScope::ByAuthor(username.clone());
    FEED_REQUEST_TOTAL.with_label_values(&[scope.label()]).inc();

    let page = PageRequest::from_token(query.page.as_deref(), state.config.feed.page_size);
    let (feed, context) = state.feed_service().compose(scope, page).await?;

    // compose resolved the author or returned NotFound above
    let author = context
        .author
        .ok_or_else(|| crate::error::AppError::Internal("author context missing".to_string()))?;

    let following = match identity.0 {
        Some(viewer) => {
            state
                .follow_service()
                .policy()
                .is_following(viewer.id, author.id)
                .await?
        }
        None => false,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "author": author,
        "num_posts": feed.total_count,
        "following": following,
        "page": feed,
    })))
}

/// Start following an author; already-following and self-follow are no-ops
/// GET /{username}/follow/
pub async fn follow(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = username.into_inner();

    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => {
            return Ok(login_redirect(
                &state.config,
                &format!("/{username}/follow/"),
            ))
        }
    };

    // Outcome does not change the response; both paths land on the profile
    state.follow_service().follow(&viewer, &username).await?;

    Ok(redirect(&profile_url(&username)))
}

/// Stop following an author; absent relation is NotFound
/// GET /{username}/unfollow/
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = username.into_inner();

    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => {
            return Ok(login_redirect(
                &state.config,
                &format!("/{username}/unfollow/"),
            ))
        }
    };

    state.follow_service().unfollow(&viewer, &username).await?;

    Ok(redirect(&profile_url(&username)))
}

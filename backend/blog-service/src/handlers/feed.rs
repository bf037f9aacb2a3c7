/// Feed handlers - the paginated post listings
use crate::error::Result;
use crate::handlers::{login_redirect, AppState, PageQuery};
use crate::metrics::FEED_REQUEST_TOTAL;
use crate::middleware::MaybeIdentity;
use crate::services::{FeedScope, PageRequest};
use actix_web::{web, HttpResponse};

/// Global feed: every post, newest first
/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let scope = FeedScope::All;
    FEED_REQUEST_TOTAL.with_label_values(&[scope.label()]).inc();

    let page = PageRequest::from_token(query.page.as_deref(), state.config.feed.page_size);
    let (feed, _) = state.feed_service().compose(scope, page).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "page": feed })))
}

/// Group feed: posts in one group, addressed by slug
/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let scope = FeedScope::ByGroup(slug.into_inner());
    FEED_REQUEST_TOTAL.with_label_values(&[scope.label()]).inc();

    let page = PageRequest::from_token(query.page.as_deref(), state.config.feed.page_size);
    let (feed, context) = state.feed_service().compose(scope, page).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "group": context.group,
        "page": feed,
    })))
}

/// Followed-authors feed for the authenticated caller
/// GET /follow/
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => return Ok(login_redirect(&state.config, "/follow/")),
    };

    let scope = FeedScope::FollowedBy(viewer.id);
    FEED_REQUEST_TOTAL.with_label_values(&[scope.label()]).inc();

    let page = PageRequest::from_token(query.page.as_deref(), state.config.feed.page_size);
    let (feed, _) = state.feed_service().compose(scope, page).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "page": feed })))
}

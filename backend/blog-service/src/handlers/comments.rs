/// Comment handlers
use crate::error::Result;
use crate::handlers::{login_redirect, post_url, redirect, AppState};
use crate::middleware::MaybeIdentity;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Form payload for a comment
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Attach a comment to a post, then return to the post page.
///
/// Reached both through POST on the post-detail route and through the
/// dedicated `/comment/` route. Blank text silently creates nothing; the
/// caller still lands back on the post.
/// POST /{username}/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(String, Uuid)>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();

    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => {
            return Ok(login_redirect(
                &state.config,
                &format!("/{username}/{post_id}/comment/"),
            ))
        }
    };

    state
        .comment_service()
        .add_comment(&viewer, &username, post_id, &form.text)
        .await?;

    Ok(redirect(&post_url(&username, post_id)))
}

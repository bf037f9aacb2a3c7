/// Post handlers - creation, detail, and author-only editing
use crate::error::{AppError, Result};
use crate::handlers::{login_redirect, post_url, profile_url, redirect, AppState};
use crate::middleware::MaybeIdentity;
use crate::services::policy;
use crate::services::{EditOutcome, PostInput};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Form payload for creating or editing a post
#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image_key: Option<String>,
}

impl From<PostForm> for PostInput {
    fn from(form: PostForm) -> Self {
        PostInput {
            text: form.text,
            group_id: form.group_id,
            image_key: form.image_key,
        }
    }
}

/// Post form context: the groups available to file a post under
/// GET /new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
) -> Result<HttpResponse> {
    if identity.0.is_none() {
        return Ok(login_redirect(&state.config, "/new/"));
    }

    let groups = state.groups.list_all().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "groups": groups })))
}

/// Create a post
/// POST /new/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    form: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => return Ok(login_redirect(&state.config, "/new/")),
    };

    let form = form.into_inner();
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .post_service()
        .create_post(&viewer, form.into())
        .await?;

    Ok(redirect("/"))
}

/// Post detail with its comments
/// GET /{username}/{post_id}/
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();

    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{username}'")))?;
    let post = state.post_service().resolve(&username, post_id).await?;
    let comments = state.comment_service().list_for_post(post.id).await?;
    let num_posts = state.posts.count_by_author(author.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "post": post,
        "author": author,
        "comments": comments,
        "num_posts": num_posts,
    })))
}

/// Edit form context; only the author may see it
/// GET /{username}/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();

    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => {
            return Ok(login_redirect(
                &state.config,
                &format!("/{username}/{post_id}/edit/"),
            ))
        }
    };

    let post = state.post_service().resolve(&username, post_id).await?;
    if !policy::can_edit(viewer.id, &post) {
        // Soft-forbidden: send the viewer to the author's profile
        return Ok(redirect(&profile_url(&username)));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "post": post })))
}

/// Apply an edit; non-authors are redirected away without mutating
/// POST /{username}/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: MaybeIdentity,
    path: web::Path<(String, Uuid)>,
    form: web::Json<PostForm>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();

    let viewer = match identity.0 {
        Some(viewer) => viewer,
        None => {
            return Ok(login_redirect(
                &state.config,
                &format!("/{username}/{post_id}/edit/"),
            ))
        }
    };

    // Ownership is checked before validation: a non-author is redirected
    // away whatever they submitted, and nothing is validated or written.
    match state
        .post_service()
        .edit_post(&viewer, &username, post_id, form.into_inner().into())
        .await?
    {
        EditOutcome::Updated(_) => Ok(redirect(&post_url(&username, post_id))),
        EditOutcome::NotAuthor => Ok(redirect(&profile_url(&username))),
    }
}

//! Comment handlers.
//!
//! Update and delete pass two gates before touching the store: the comment
//! must exist (404, no body) and the caller must be its author (403, no body).

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Comment, CommentFilter, CommentPatch, NewComment};
use quill_shared::dto::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};

use crate::extract::ValidatedJson;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content,
        user: comment.author,
        post_slug: comment.post_slug,
        parent_comment: comment.parent_comment,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

/// A path segment that is not an ID cannot name any comment.
fn comment_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// Resolve `parentComment` to the ID of an existing comment.
async fn resolve_parent(state: &AppState, raw: &str) -> AppResult<Uuid> {
    let id = Uuid::parse_str(raw).map_err(|_| {
        AppError::field("parentComment", "Parent comment must be a comment ID")
    })?;

    match state.comments.find_one(&CommentFilter::by_id(id)).await? {
        Some(parent) => Ok(parent.id),
        None => Err(AppError::field("parentComment", "Parent comment not found")),
    }
}

/// Existence then ownership. Returns the stored comment when both pass.
async fn authored_comment(state: &AppState, id: Uuid, identity: &Identity) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_one(&CommentFilter::by_id(id))
        .await?
        .ok_or(AppError::NotFound)?;

    if !comment.is_authored_by(identity.user_id) {
        tracing::debug!(comment_id = %id, user_id = %identity.user_id, "Caller is not the author");
        return Err(AppError::Forbidden);
    }

    Ok(comment)
}

/// Matches only while the comment still exists and is still the caller's.
fn owned_by(id: Uuid, identity: &Identity) -> CommentFilter {
    CommentFilter {
        id: Some(id),
        author: Some(identity.user_id),
        ..CommentFilter::default()
    }
}

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: ValidatedJson<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let parent_comment = match req.parent_comment.as_deref() {
        Some(raw) => Some(resolve_parent(&state, raw).await?),
        None => None,
    };

    let comment = state
        .comments
        .create(NewComment {
            content: req.content.unwrap_or_default(),
            post_slug: req.post_slug.unwrap_or_default(),
            author: identity.user_id,
            parent_comment,
        })
        .await?;

    tracing::info!(comment_id = %comment.id, post_slug = %comment.post_slug, "Comment created");
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// GET /api/comments/{postSlug} - newest first, `[]` for an unknown post.
pub async fn get_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_slug = path.into_inner();
    let comments = state.comments.find_all_by_post(&post_slug).await?;
    let body: Vec<CommentResponse> = comments.into_iter().map(comment_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/comments/{commentId}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: ValidatedJson<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = comment_id(&path)?;
    authored_comment(&state, id, &identity).await?;

    let patch = CommentPatch {
        content: body.into_inner().content,
    };
    let updated = state
        .comments
        .update(&owned_by(id, &identity), patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(comment_response(updated)))
}

/// DELETE /api/comments/{commentId}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = comment_id(&path)?;
    authored_comment(&state, id, &identity).await?;

    if state.comments.delete(&owned_by(id, &identity)).await? == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(comment_id = %id, "Comment deleted");
    Ok(HttpResponse::Ok().finish())
}

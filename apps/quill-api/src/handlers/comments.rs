//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_core::locator::{self, PostCriteria};
use quill_shared::ApiResponse;
use quill_shared::dto::{CommentPayload, CommentResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: &Comment) -> AppResult<CommentResponse> {
    let id = comment
        .id
        .ok_or_else(|| AppError::Internal("comment loaded without an id".to_string()))?;

    Ok(CommentResponse {
        id,
        post_id: comment.post_id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    })
}

/// GET /api/posts/{id}/comments - active comments, oldest first.
pub async fn list(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    // Comments of a missing post read as 404, not an empty list.
    locator::locate(state.posts.as_ref(), &PostCriteria::by_id(post_id)).await?;

    let comments = state.comments.active_for_post(post_id).await?;
    let comments = comments
        .iter()
        .map(comment_response)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

/// POST /api/posts/{id}/comments - open to any visitor.
pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    locator::locate(state.posts.as_ref(), &PostCriteria::by_id(post_id)).await?;

    let req = body.into_inner();
    let comment = Comment::new(post_id, req.name, req.email, req.body);
    comment.validate()?;

    let saved = state.comments.insert(comment).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(&saved)?)))
}

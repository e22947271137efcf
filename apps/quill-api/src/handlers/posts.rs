//! Post handlers - browsing, detail resolution, and owner-only mutations.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Post, PostStatus};
use quill_core::locator::{self, PostCriteria};
use quill_core::ports::{Page, Paginated};
use quill_shared::ApiResponse;
use quill_shared::dto::{ListQuery, PostPageResponse, PostPayload, PostResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Render a post for the API, including its canonical URL.
pub(crate) fn post_response(post: &Post) -> AppResult<PostResponse> {
    let id = post
        .id
        .ok_or_else(|| AppError::Internal("post loaded without an id".to_string()))?;
    let address = locator::canonical_address(post);

    Ok(PostResponse {
        id,
        title: post.title.clone(),
        text: post.text.clone(),
        status: post.status.to_string(),
        slug: post.slug.clone(),
        owner_id: post.owner_id,
        tags: post.tags.clone(),
        url: address.path(),
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

fn page_response(page: Paginated<Post>) -> AppResult<PostPageResponse> {
    let items = page
        .items
        .iter()
        .map(post_response)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(PostPageResponse {
        items,
        page: page.page,
        total_items: page.total_items,
        total_pages: page.total_pages,
    })
}

/// GET /api/posts - published posts, newest publication first.
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.page.unwrap_or(1), state.page_size);
    let posts = state.posts.published(page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(posts)?)))
}

/// GET /api/posts/all - every post, drafts included.
pub async fn list_all(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.page.unwrap_or(1), state.page_size);
    let posts = state.posts.all(page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(posts)?)))
}

/// GET /api/posts/{id}
pub async fn detail_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let criteria = PostCriteria::by_id(path.into_inner());
    let post = locator::locate(state.posts.as_ref(), &criteria).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post)?)))
}

/// GET /api/posts/{year}/{month}/{day}/{slug} - the canonical address.
pub async fn detail_by_date_slug(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let criteria = PostCriteria::by_date_slug(year, month, day, slug);
    let post = locator::locate(state.posts.as_ref(), &criteria).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post)?)))
}

/// POST /api/posts - create a post owned by the caller.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let status = req.status.parse::<PostStatus>()?;
    let post = Post::new(identity.author_id, req.title, req.text, status, req.tags);
    post.validate()?;

    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(&saved)?)))
}

/// PUT /api/posts/{id} - owner-only update of title/text/status/tags.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let existing = locator::locate(state.posts.as_ref(), &PostCriteria::by_id(id)).await?;

    if existing.owner_id != identity.author_id {
        return Err(AppError::Forbidden);
    }

    let req = body.into_inner();
    let mut post = existing;
    post.title = req.title;
    post.text = req.text;
    post.status = req.status.parse::<PostStatus>()?;
    post.tags = req.tags;
    post.validate()?;

    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&saved)?)))
}

/// DELETE /api/posts/{id} - owner-only; comments go with the post.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let existing = locator::locate(state.posts.as_ref(), &PostCriteria::by_id(id)).await?;

    if existing.owner_id != identity.author_id {
        return Err(AppError::Forbidden);
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

//! Title search.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::{SearchQuery, SearchResponse};

use crate::handlers::posts::post_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/search?q= - case-insensitive title-substring search. An empty
/// query returns every post.
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner().q;

    let posts = state.posts.search(&q).await?;
    let results = posts
        .iter()
        .map(post_response)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SearchResponse { query: q, results })))
}

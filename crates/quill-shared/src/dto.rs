//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to register a new author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response containing an author's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Payload for creating or updating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub text: String,
    /// `"draft"` or `"published"`.
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A post as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub status: String,
    pub slug: String,
    pub owner_id: i64,
    pub tags: Vec<String>,
    /// Canonical date-and-slug path of the post.
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of posts plus paging totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub items: Vec<PostResponse>,
    pub page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Query string for the paginated list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
}

/// Query string for title search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results, echoing the query back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<PostResponse>,
}

/// Payload for submitting a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
    pub name: String,
    pub email: String,
    pub body: String,
}

/// A comment as served by the API. Submitter emails stay private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

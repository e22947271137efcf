use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::slug::slugify;
use crate::error::DomainError;

/// Maximum length of a post title, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Publication state of a post. Drafts are hidden from the published-only
/// browse path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    /// Single-character code used by the storage layer.
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "D",
            PostStatus::Published => "P",
        }
    }

    /// Inverse of [`PostStatus::code`]. Unknown codes read as Draft so a
    /// corrupted row degrades to the invisible state.
    pub fn from_code(code: &str) -> Self {
        match code {
            "P" => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "unknown post status '{other}', expected 'draft' or 'published'"
            ))),
        }
    }
}

/// Post entity - a blog post with a draft/published lifecycle and a
/// date-scoped slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Assigned by the persistence layer on first insert.
    pub id: Option<i64>,
    pub owner_id: i64,
    pub title: String,
    pub text: String,
    pub status: PostStatus,
    /// Derived from `title` on every save; unique per creation date.
    pub slug: String,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, not yet persisted post owned by `owner_id`.
    pub fn new(
        owner_id: i64,
        title: String,
        text: String,
        status: PostStatus,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner_id,
            slug: slugify(&title),
            title,
            text,
            status,
            tags: normalize_tags(tags),
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar date (UTC) of creation - the scope of slug uniqueness.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Check the save preconditions: title and text present, title within
    /// bounds and reducible to a non-empty slug.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("text must not be empty".into()));
        }
        if slugify(&self.title).is_empty() {
            return Err(DomainError::Validation(
                "title must contain at least one alphanumeric character".into(),
            ));
        }
        Ok(())
    }
}

/// Normalize a tag list into an order-insensitive set: trimmed, empties
/// dropped, duplicates removed, sorted.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_title(title: &str) -> Post {
        Post::new(1, title.to_string(), "body".to_string(), PostStatus::Draft, vec![])
    }

    #[test]
    fn new_post_defaults() {
        let post = post_with_title("Hello World");
        assert!(post.id.is_none());
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.published_at, post.created_at);
    }

    #[test]
    fn validate_rejects_empty_title() {
        let post = post_with_title("   ");
        assert!(matches!(post.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_overlong_title() {
        let post = post_with_title(&"x".repeat(MAX_TITLE_LEN + 1));
        assert!(matches!(post.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_unsluggable_title() {
        let post = post_with_title("!!!");
        assert!(matches!(post.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_text() {
        let mut post = post_with_title("Hello");
        post.text = String::new();
        assert!(matches!(post.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn tags_are_an_order_insensitive_set() {
        let tags = normalize_tags(vec![
            "rust".into(),
            "  web ".into(),
            "rust".into(),
            "".into(),
        ]);
        assert_eq!(tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn status_round_trips_through_codes() {
        assert_eq!(PostStatus::from_code(PostStatus::Draft.code()), PostStatus::Draft);
        assert_eq!(
            PostStatus::from_code(PostStatus::Published.code()),
            PostStatus::Published
        );
    }

    #[test]
    fn status_parses_from_api_strings() {
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert_eq!("published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert!("archived".parse::<PostStatus>().is_err());
    }
}

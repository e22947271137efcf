use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Comment entity - a visitor comment attached to exactly one post.
///
/// Comments are never reparented; they disappear with their post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    /// Soft-hide flag; inactive comments stay stored but are not listed.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new, not yet persisted comment on `post_id`.
    pub fn new(post_id: i64, name: String, email: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            post_id,
            name,
            email,
            body,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the submission preconditions: all fields present, email shaped
    /// like an address.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".into()));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(DomainError::Validation(
                "a valid email address is required".into(),
            ));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::Validation("body must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comment_is_active() {
        let comment = Comment::new(1, "Ada".into(), "ada@example.com".into(), "Nice.".into());
        assert!(comment.active);
        assert!(comment.id.is_none());
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_email() {
        let comment = Comment::new(1, "Ada".into(), "".into(), "Nice.".into());
        assert!(matches!(comment.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_malformed_email() {
        let comment = Comment::new(1, "Ada".into(), "not-an-address".into(), "Nice.".into());
        assert!(matches!(comment.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_body() {
        let comment = Comment::new(1, "Ada".into(), "ada@example.com".into(), "  ".into());
        assert!(matches!(comment.validate(), Err(DomainError::Validation(_))));
    }
}

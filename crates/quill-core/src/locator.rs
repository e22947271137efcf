//! Resolving a single post from either addressing scheme.

use chrono::{Datelike, NaiveDate};

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::PostRepository;

/// Composite address: the creation calendar date plus the date-scoped slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSlug {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub slug: String,
}

impl DatedSlug {
    /// Resolve the calendar date, rejecting impossible combinations.
    pub fn date(&self) -> Result<NaiveDate, DomainError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            DomainError::InvalidRequest(format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            ))
        })
    }

    /// Path under which the post is canonically served.
    pub fn path(&self) -> String {
        format!(
            "/api/posts/{}/{:02}/{:02}/{}",
            self.year, self.month, self.day, self.slug
        )
    }
}

/// Lookup criteria as parsed from an inbound request.
#[derive(Debug, Clone, Default)]
pub struct PostCriteria {
    pub id: Option<i64>,
    pub dated: Option<DatedSlug>,
}

impl PostCriteria {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_date_slug(year: i32, month: u32, day: u32, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            dated: Some(DatedSlug {
                year,
                month,
                day,
                slug: slug.into(),
            }),
        }
    }
}

/// Resolve exactly one post.
///
/// The id branch is unique by construction. The dated branch must match
/// exactly one row under the per-date slug invariant; zero or several
/// matches read as `NotFound`. Criteria carrying neither scheme fail with
/// `InvalidRequest`.
pub async fn locate(
    repo: &dyn PostRepository,
    criteria: &PostCriteria,
) -> Result<Post, DomainError> {
    if let Some(id) = criteria.id {
        return repo
            .find_by_id(id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "post",
                key: id.to_string(),
            });
    }

    if let Some(dated) = &criteria.dated {
        let date = dated.date()?;
        let mut matches = repo.find_by_date_slug(date, &dated.slug).await?;
        return if matches.len() == 1 {
            Ok(matches.remove(0))
        } else {
            Err(DomainError::NotFound {
                entity: "post",
                key: format!("{}/{}", date, dated.slug),
            })
        };
    }

    Err(DomainError::InvalidRequest(
        "neither an id nor a date and slug was supplied".into(),
    ))
}

/// Composite address of a post - the inverse of the dated branch of
/// [`locate`].
pub fn canonical_address(post: &Post) -> DatedSlug {
    let date = post.created_on();
    DatedSlug {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        slug: post.slug.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_slug_rejects_impossible_dates() {
        let address = DatedSlug {
            year: 2024,
            month: 13,
            day: 1,
            slug: "hello-world".into(),
        };
        assert!(matches!(address.date(), Err(DomainError::InvalidRequest(_))));

        let address = DatedSlug {
            year: 2023,
            month: 2,
            day: 29,
            slug: "hello-world".into(),
        };
        assert!(matches!(address.date(), Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn dated_slug_renders_a_zero_padded_path() {
        let address = DatedSlug {
            year: 2024,
            month: 1,
            day: 5,
            slug: "hello-world".into(),
        };
        assert_eq!(address.path(), "/api/posts/2024/01/05/hello-world");
    }

    #[test]
    fn canonical_address_uses_the_creation_date() {
        use crate::domain::{Post, PostStatus};
        use crate::lifecycle;
        use chrono::{TimeZone, Utc};

        let post = Post::new(
            1,
            "Hello World".into(),
            "body".into(),
            PostStatus::Draft,
            vec![],
        );
        let created = Utc.with_ymd_and_hms(2024, 1, 5, 12, 30, 0).unwrap();
        let post = lifecycle::on_save(None, post, created);

        let address = canonical_address(&post);
        assert_eq!((address.year, address.month, address.day), (2024, 1, 5));
        assert_eq!(address.slug, "hello-world");
        assert_eq!(address.path(), "/api/posts/2024/01/05/hello-world");
    }
}

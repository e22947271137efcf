use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Author, Comment, Post};
use crate::error::RepoError;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Clamp to the first page and a minimum size of one.
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Generic repository trait defining the lookups shared by all entities.
#[async_trait]
pub trait BaseRepository<T>: Send + Sync {
    /// Find an entity by its unique id.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its id; `NotFound` when nothing was there.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Post repository - the save path owns the lifecycle invariants.
#[async_trait]
pub trait PostRepository: BaseRepository<Post> {
    /// Insert (`id == None`) or update (`id == Some`) a post, applying the
    /// lifecycle rules atomically with the read of the previous version.
    ///
    /// Fails with `Constraint` when the recomputed slug collides with
    /// another post created the same calendar day, and with `NotFound`
    /// when an update addresses a row that no longer exists.
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    /// Every post whose creation date and slug match. The locator enforces
    /// the exactly-one contract on top of this.
    async fn find_by_date_slug(&self, date: NaiveDate, slug: &str)
    -> Result<Vec<Post>, RepoError>;

    /// All posts, newest publication first.
    async fn all(&self, page: Page) -> Result<Paginated<Post>, RepoError>;

    /// Published posts only, newest publication first.
    async fn published(&self, page: Page) -> Result<Paginated<Post>, RepoError>;

    /// Posts whose title contains `query`, case-insensitively. An empty
    /// query matches every post.
    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository. Deletion happens only through the owning post's
/// cascade.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment> {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Active comments for a post, oldest first.
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author> {
    /// Fails with `Constraint` when the email is already registered.
    async fn insert(&self, author: Author) -> Result<Author, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_to_one_based() {
        let page = Page::new(0, 0);
        assert_eq!(page, Page::new(1, 1));
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_offset_skips_previous_pages() {
        assert_eq!(Page::new(3, 5).offset(), 10);
    }
}

//! In-memory repositories - the fallback when no database is configured,
//! and the workhorse for behavioral tests.
//!
//! All three repositories share one store behind a single `RwLock`, so the
//! Post to Comment delete cascade and the save-path read-modify-write both
//! happen under one lock scope. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{Author, Comment, Post};
use quill_core::error::RepoError;
use quill_core::lifecycle;
use quill_core::ports::{
    AuthorRepository, BaseRepository, CommentRepository, Page, Paginated, PostRepository,
};

#[derive(Default)]
struct Store {
    posts: HashMap<i64, Post>,
    comments: HashMap<i64, Comment>,
    authors: HashMap<i64, Author>,
    next_post_id: i64,
    next_comment_id: i64,
    next_author_id: i64,
}

/// Shared backing store for the in-memory repositories. Clones are cheap
/// handles onto the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            store: self.clone(),
        }
    }

    pub fn authors(&self) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository {
            store: self.clone(),
        }
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    store: InMemoryStore,
}

/// In-memory author repository.
pub struct InMemoryAuthorRepository {
    store: InMemoryStore,
}

fn paginate(posts: Vec<Post>, page: Page) -> Paginated<Post> {
    let total_items = posts.len() as u64;
    let total_pages = total_items.div_ceil(page.size);
    let items = posts
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect();

    Paginated {
        items,
        page: page.number,
        total_items,
        total_pages,
    }
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    posts
}

#[async_trait]
impl BaseRepository<Post> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let store = self.store.inner.read().await;
        Ok(store.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.inner.write().await;
        if store.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Cascade: comments go with their post.
        store.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        // Holding the write lock across the previous-version read and the
        // insert keeps the status comparison and the uniqueness check
        // atomic, matching the transaction scope of the SQL adapter.
        let mut store = self.store.inner.write().await;

        let previous = match post.id {
            Some(id) => Some(store.posts.get(&id).cloned().ok_or(RepoError::NotFound)?),
            None => None,
        };

        let mut prepared = lifecycle::on_save(previous.as_ref(), post, Utc::now());

        let collides = store.posts.values().any(|other| {
            other.id != prepared.id
                && other.created_on() == prepared.created_on()
                && other.slug == prepared.slug
        });
        if collides {
            return Err(RepoError::Constraint(
                "a post with this slug already exists for that date".to_string(),
            ));
        }

        let id = match prepared.id {
            Some(id) => id,
            None => {
                store.next_post_id += 1;
                let id = store.next_post_id;
                prepared.id = Some(id);
                id
            }
        };

        store.posts.insert(id, prepared.clone());
        Ok(prepared)
    }

    async fn find_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.inner.read().await;
        Ok(store
            .posts
            .values()
            .filter(|post| post.created_on() == date && post.slug == slug)
            .cloned()
            .collect())
    }

    async fn all(&self, page: Page) -> Result<Paginated<Post>, RepoError> {
        let store = self.store.inner.read().await;
        let posts = newest_first(store.posts.values().cloned().collect());
        Ok(paginate(posts, page))
    }

    async fn published(&self, page: Page) -> Result<Paginated<Post>, RepoError> {
        let store = self.store.inner.read().await;
        let posts = newest_first(
            store
                .posts
                .values()
                .filter(|post| post.is_published())
                .cloned()
                .collect(),
        );
        Ok(paginate(posts, page))
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let store = self.store.inner.read().await;
        let needle = query.trim().to_lowercase();
        let posts = newest_first(
            store
                .posts
                .values()
                .filter(|post| needle.is_empty() || post.title.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        );
        Ok(posts)
    }
}

#[async_trait]
impl BaseRepository<Comment> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let store = self.store.inner.read().await;
        Ok(store.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.inner.write().await;
        if store.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut store = self.store.inner.write().await;

        if !store.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(
                "the referenced post does not exist".to_string(),
            ));
        }

        store.next_comment_id += 1;
        let id = store.next_comment_id;
        let mut comment = comment;
        comment.id = Some(id);
        store.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.inner.read().await;
        let mut comments: Vec<Comment> = store
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id && comment.active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Author> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, RepoError> {
        let store = self.store.inner.read().await;
        Ok(store.authors.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.inner.write().await;
        if store.authors.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn insert(&self, author: Author) -> Result<Author, RepoError> {
        let mut store = self.store.inner.write().await;

        if store.authors.values().any(|a| a.email == author.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }

        store.next_author_id += 1;
        let id = store.next_author_id;
        let mut author = author;
        author.id = Some(id);
        store.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        let store = self.store.inner.read().await;
        Ok(store.authors.values().find(|a| a.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::PostStatus;
    use quill_core::locator::{self, PostCriteria};
    use quill_core::{DomainError, error::RepoError};

    fn draft(title: &str) -> Post {
        Post::new(
            1,
            title.to_string(),
            "body".to_string(),
            PostStatus::Draft,
            vec![],
        )
    }

    #[tokio::test]
    async fn save_assigns_an_id_and_derives_the_slug() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let saved = posts.save(draft("Hello World")).await.unwrap();

        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.slug, "hello-world");
        // The insert default for published_at is the construction time,
        // which never trails the persistence timestamp.
        assert!(saved.published_at <= saved.created_at);
    }

    #[tokio::test]
    async fn updating_a_missing_post_fails() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let mut ghost = draft("Hello World");
        ghost.id = Some(42);

        assert!(matches!(
            posts.save(ghost).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn created_at_survives_later_saves() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let saved = posts.save(draft("Hello World")).await.unwrap();

        let mut edited = saved.clone();
        edited.text = "updated body".to_string();
        let resaved = posts.save(edited).await.unwrap();

        assert_eq!(resaved.created_at, saved.created_at);
        assert!(resaved.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn publishing_advances_published_at_exactly_once() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let saved = posts.save(draft("Hello World")).await.unwrap();

        let mut publishing = saved.clone();
        publishing.status = PostStatus::Published;
        let published = posts.save(publishing).await.unwrap();
        assert!(published.published_at >= saved.published_at);

        let resaved = posts.save(published.clone()).await.unwrap();
        assert_eq!(resaved.published_at, published.published_at);
    }

    #[tokio::test]
    async fn slug_collision_on_the_same_date_is_rejected() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        posts.save(draft("Hello World")).await.unwrap();

        // Same title, same creation date: the derived slug collides.
        let result = posts.save(draft("Hello World")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        // Punctuation-only differences collide too.
        let result = posts.save(draft("Hello, World!")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn renaming_a_post_keeps_slugs_unique() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        posts.save(draft("First")).await.unwrap();
        let second = posts.save(draft("Second")).await.unwrap();

        let mut renamed = second.clone();
        renamed.title = "First".to_string();

        assert!(matches!(
            posts.save(renamed).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn locate_round_trips_with_the_canonical_address() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let saved = posts.save(draft("Hello World")).await.unwrap();
        let address = locator::canonical_address(&saved);

        let by_id = locator::locate(&posts, &PostCriteria::by_id(saved.id.unwrap()))
            .await
            .unwrap();
        let by_address = locator::locate(
            &posts,
            &PostCriteria::by_date_slug(address.year, address.month, address.day, address.slug),
        )
        .await
        .unwrap();

        assert_eq!(by_id.id, by_address.id);
        assert_eq!(by_id.slug, by_address.slug);
    }

    #[tokio::test]
    async fn locate_rejects_empty_criteria() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        let result = locator::locate(&posts, &PostCriteria::default()).await;
        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn locate_misses_read_as_not_found() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        posts.save(draft("Hello World")).await.unwrap();

        let result = locator::locate(&posts, &PostCriteria::by_id(999)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result =
            locator::locate(&posts, &PostCriteria::by_date_slug(1999, 1, 1, "hello-world")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn published_hides_drafts_and_all_shows_everything() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        posts.save(draft("Draft Post")).await.unwrap();
        let mut publishing = posts.save(draft("Published Post")).await.unwrap();
        publishing.status = PostStatus::Published;
        posts.save(publishing).await.unwrap();

        let page = Page::new(1, 10);
        let published = posts.published(page).await.unwrap();
        let all = posts.all(page).await.unwrap();

        assert_eq!(published.total_items, 1);
        assert_eq!(published.items[0].title, "Published Post");
        assert_eq!(all.total_items, 2);
    }

    #[tokio::test]
    async fn pagination_totals_and_boundaries() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        for i in 1..=7 {
            posts.save(draft(&format!("Post {i}"))).await.unwrap();
        }

        let first = posts.all(Page::new(1, 5)).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total_items, 7);
        assert_eq!(first.total_pages, 2);

        let second = posts.all(Page::new(2, 5)).await.unwrap();
        assert_eq!(second.items.len(), 2);

        let beyond = posts.all(Page::new(3, 5)).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 7);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_empty_matches_all() {
        let store = InMemoryStore::new();
        let posts = store.posts();

        posts.save(draft("Hello World")).await.unwrap();
        posts.save(draft("HELLO Again")).await.unwrap();
        posts.save(draft("Unrelated")).await.unwrap();

        let hits = posts.search("hello").await.unwrap();
        assert_eq!(hits.len(), 2);

        let all = posts.search("").await.unwrap();
        assert_eq!(all.len(), 3);

        let none = posts.search("nope").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_its_comments() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let comments = store.comments();

        let post = posts.save(draft("Hello World")).await.unwrap();
        let post_id = post.id.unwrap();

        for i in 0..3 {
            comments
                .insert(Comment::new(
                    post_id,
                    format!("Visitor {i}"),
                    "visitor@example.com".to_string(),
                    "Nice post".to_string(),
                ))
                .await
                .unwrap();
        }
        assert_eq!(comments.active_for_post(post_id).await.unwrap().len(), 3);

        posts.delete(post_id).await.unwrap();

        assert_eq!(comments.active_for_post(post_id).await.unwrap().len(), 0);
        assert!(matches!(
            posts.delete(post_id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn comments_on_missing_posts_are_rejected() {
        let store = InMemoryStore::new();
        let comments = store.comments();

        let result = comments
            .insert(Comment::new(
                99,
                "Visitor".to_string(),
                "visitor@example.com".to_string(),
                "Hello?".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn inactive_comments_stay_hidden() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let comments = store.comments();

        let post = posts.save(draft("Hello World")).await.unwrap();
        let post_id = post.id.unwrap();

        let mut hidden = Comment::new(
            post_id,
            "Visitor".to_string(),
            "visitor@example.com".to_string(),
            "Spam".to_string(),
        );
        hidden.active = false;
        comments.insert(hidden).await.unwrap();

        assert!(comments.active_for_post(post_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn author_emails_are_unique() {
        let store = InMemoryStore::new();
        let authors = store.authors();

        authors
            .insert(Author::new(
                "ada".to_string(),
                "ada@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap();

        let result = authors
            .insert(Author::new(
                "ada2".to_string(),
                "ada@example.com".to_string(),
                "hash".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}

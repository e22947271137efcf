//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{AuthorRepository, CommentRepository, PostRepository};
use quill_infra::database::{
    self, DatabaseConfig, InMemoryStore, PostgresAuthorRepository, PostgresCommentRepository,
    PostgresPostRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub page_size: u64,
}

impl AppState {
    /// Build the application state with appropriate repository backends.
    pub async fn new(db_config: Option<&DatabaseConfig>, page_size: u64) -> Self {
        match db_config {
            Some(config) => match database::connect(config).await {
                Ok(conn) => {
                    return Self {
                        posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
                        authors: Arc::new(PostgresAuthorRepository::new(conn)),
                        page_size,
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {e}. Using the in-memory store."
                    );
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
            }
        }

        Self::in_memory(page_size)
    }

    /// State backed by a fresh in-memory store. Nothing survives a restart.
    pub fn in_memory(page_size: u64) -> Self {
        let store = InMemoryStore::new();
        Self {
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            authors: Arc::new(store.authors()),
            page_size,
        }
    }
}

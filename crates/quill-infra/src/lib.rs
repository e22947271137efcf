//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database adapters and the authentication
//! services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory repositories only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{
    InMemoryAuthorRepository, InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore,
};

// Re-exports - Postgres
#[cfg(feature = "postgres")]
pub use database::{PostgresAuthorRepository, PostgresCommentRepository, PostgresPostRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtTokenService};

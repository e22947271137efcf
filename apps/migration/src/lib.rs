//! Schema migrations for the Quill database.

pub use sea_orm_migration::prelude::*;

mod m20250115_000001_create_authors;
mod m20250115_000002_create_posts;
mod m20250115_000003_create_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_authors::Migration),
            Box::new(m20250115_000002_create_posts::Migration),
            Box::new(m20250115_000003_create_comments::Migration),
        ]
    }
}

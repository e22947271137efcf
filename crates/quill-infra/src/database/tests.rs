use sea_orm::{DatabaseBackend, MockDatabase};

use quill_core::domain::Post;
use quill_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, TagList};
use super::postgres_repo::PostgresPostRepository;

fn sample_model(id: i64) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        owner_id: 7,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        status: "P".to_owned(),
        slug: "test-post".to_owned(),
        tags: TagList(vec!["rust".to_owned()]),
        created_on: now.date_naive(),
        published_at: now.into(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_maps_the_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_model(1)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(1).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, Some(1));
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.slug, "test-post");
    assert_eq!(post.tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn find_by_date_slug_maps_all_matches() {
    let model = sample_model(3);
    let date = model.created_on;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let matches = repo.find_by_date_slug(date, "test-post").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].slug, "test-post");
}

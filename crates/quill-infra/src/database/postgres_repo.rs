//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, TryIntoModel,
};

use quill_core::domain::{Author, Comment, Post, PostStatus};
use quill_core::error::RepoError;
use quill_core::lifecycle;
use quill_core::ports::{AuthorRepository, CommentRepository, Page, Paginated, PostRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn constraint_or_query(e: sea_orm::DbErr, constraint_msg: &str) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") || err_str.contains("foreign key")
    {
        RepoError::Constraint(constraint_msg.to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Escape LIKE metacharacters so a search term matches literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        // The previous-version read and the write share one transaction,
        // so the status comparison cannot interleave with a concurrent
        // save of the same post.
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let previous = match post.id {
            Some(id) => {
                let row = PostEntity::find_by_id(id)
                    .one(&txn)
                    .await
                    .map_err(query_err)?;
                match row {
                    Some(model) => Some(Post::from(model)),
                    None => return Err(RepoError::NotFound),
                }
            }
            None => None,
        };

        let prepared = lifecycle::on_save(previous.as_ref(), post, Utc::now());

        let active: post::ActiveModel = prepared.into();
        let saved = active.save(&txn).await.map_err(|e| {
            constraint_or_query(e, "a post with this slug already exists for that date")
        })?;

        let model = saved.try_into_model().map_err(query_err)?;

        txn.commit()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(model.into())
    }

    async fn find_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::CreatedOn.eq(date))
            .filter(post::Column::Slug.eq(slug))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn all(&self, page: Page) -> Result<Paginated<Post>, RepoError> {
        let paginator = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .paginate(&self.db, page.size);

        let totals = paginator.num_items_and_pages().await.map_err(query_err)?;
        let models = paginator
            .fetch_page(page.number - 1)
            .await
            .map_err(query_err)?;

        Ok(Paginated {
            items: models.into_iter().map(Into::into).collect(),
            page: page.number,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    async fn published(&self, page: Page) -> Result<Paginated<Post>, RepoError> {
        let paginator = PostEntity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.code()))
            .order_by_desc(post::Column::PublishedAt)
            .paginate(&self.db, page.size);

        let totals = paginator.num_items_and_pages().await.map_err(query_err)?;
        let models = paginator
            .fetch_page(page.number - 1)
            .await
            .map_err(query_err)?;

        Ok(Paginated {
            items: models.into_iter().map(Into::into).collect(),
            page: page.number,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find().order_by_desc(post::Column::PublishedAt);

        let needle = query.trim().to_lowercase();
        if !needle.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                    .like(format!("%{}%", escape_like(&needle))),
            );
        }

        let rows = select.all(&self.db).await.map_err(query_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = comment.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| constraint_or_query(e, "the referenced post does not exist"))?;

        Ok(model.into())
    }

    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn insert(&self, author: Author) -> Result<Author, RepoError> {
        let active: author::ActiveModel = author.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| constraint_or_query(e, "email already registered"))?;

        Ok(model.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        // Mask the email for logging to keep PII out of logs
        let masked = match email.find('@') {
            Some(at_pos) => {
                let (local, domain) = email.split_at(at_pos);
                if local.len() > 1 {
                    format!("{}***{}", &local[..1], domain)
                } else {
                    format!("***{domain}")
                }
            }
            None => "***".to_string(),
        };
        tracing::debug!(author_email = %masked, "Finding author by email");

        let result = AuthorEntity::find()
            .filter(author::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

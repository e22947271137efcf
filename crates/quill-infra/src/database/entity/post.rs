//! Post entity for SeaORM.

use sea_orm::ActiveValue::NotSet;
use sea_orm::FromJsonQueryResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag labels stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TagList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    /// Single-character status code, `"D"` or `"P"`.
    pub status: String,
    pub slug: String,
    pub tags: TagList,
    /// UTC calendar date of `created_at`. Backs the per-date slug
    /// uniqueness index and the composite date-and-slug lookup.
    pub created_on: Date,
    pub published_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::OwnerId",
        to = "super::author::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            owner_id: model.owner_id,
            title: model.title,
            text: model.text,
            status: quill_core::domain::PostStatus::from_code(&model.status),
            slug: model.slug,
            tags: model.tags.0,
            published_at: model.published_at.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from the domain Post to a SeaORM ActiveModel. An unassigned
/// id stays `NotSet` so the database allocates one on insert.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        Self {
            id: post.id.map_or(NotSet, Set),
            owner_id: Set(post.owner_id),
            title: Set(post.title),
            text: Set(post.text),
            status: Set(post.status.code().to_string()),
            slug: Set(post.slug),
            tags: Set(TagList(post.tags)),
            created_on: Set(post.created_at.date_naive()),
            published_at: Set(post.published_at.into()),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

//! Article entity - the leaf of the content hierarchy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Article entity.
///
/// Perma-name is unique per (tenant, channel, category, sub-category,
/// culture). `publish_unixtime` / `expire_unixtime` are derived from
/// `publish` / `expire` at write time so the visibility window can be
/// compared against a single epoch snapshot.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// Owning tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    /// Article title.
    #[validate(length(min = 1))]
    pub title: String,

    /// Short description (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Rendered body text (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,

    /// Markdown source of the body (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub markdown_text: Option<String>,

    /// Canonical URL (optional).
    #[sea_orm(nullable)]
    pub url: Option<String>,

    /// Start of the public visibility window.
    pub publish: DateTimeUtc,

    /// `publish` as epoch seconds, derived at write time.
    #[sea_orm(indexed)]
    pub publish_unixtime: i64,

    /// End of the public visibility window.
    pub expire: DateTimeUtc,

    /// `expire` as epoch seconds, derived at write time.
    pub expire_unixtime: i64,

    /// Cover image id (optional).
    #[sea_orm(nullable)]
    pub image_id: Option<String>,

    /// Cover image URL (optional).
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Free-form tag list (optional).
    #[sea_orm(nullable)]
    pub tags: Option<String>,

    /// Parent channel.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub channel_id: String,

    /// Parent category.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub category_id: String,

    /// Parent sub-category.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub sub_category_id: String,

    /// Author reference.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub author_id: String,

    /// Locale code distinguishing translated variants, e.g. "en-US".
    #[validate(length(min = 1))]
    pub culture: String,

    /// Human-readable identifier, unique per
    /// (tenant, channel, category, sub-category, culture).
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 256))]
    pub perma_name: String,

    /// Soft-delete flag. Excluded from public reads when set.
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Publish flag.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// When the article was created.
    pub created: DateTimeUtc,

    /// When the article was last modified.
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::channel::Entity",
        from = "Column::ChannelId",
        to = "super::channel::Column::Id"
    )]
    Channel,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::sub_category::Entity",
        from = "Column::SubCategoryId",
        to = "super::sub_category::Column::Id"
    )]
    SubCategory,
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<super::channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Channel.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategory.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

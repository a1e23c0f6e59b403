//! Author entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Author entity. Perma-name is unique per tenant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "author")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// Owning tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    /// Human-readable identifier, unique per tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 256))]
    pub perma_name: String,

    /// Display name.
    #[validate(length(min = 1))]
    pub name: String,

    /// Alternate name, e.g. a pen name (optional).
    #[sea_orm(nullable)]
    pub alter_name: Option<String>,

    /// Author introduction (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Avatar image URL (optional).
    #[sea_orm(nullable)]
    pub icon_image_url: Option<String>,

    /// Ordering hint for listings.
    #[sea_orm(default_value = 0)]
    pub display_order: i32,

    /// Soft-delete flag. Excluded from public reads when set.
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Publish flag.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// When the author was created.
    pub created: DateTimeUtc,

    /// When the author was last modified.
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article::Entity")]
    Articles,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

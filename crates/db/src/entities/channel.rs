//! Channel entity - the top level of the content hierarchy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Channel entity. Perma-name is unique per tenant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "channel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// Owning tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    /// Channel name.
    #[validate(length(min = 1))]
    pub name: String,

    /// Human-readable identifier, unique per tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 256))]
    pub perma_name: String,

    /// Ordering hint for listings.
    #[sea_orm(default_value = 0)]
    pub display_order: i32,

    /// Display title (optional).
    #[sea_orm(nullable)]
    pub title: Option<String>,

    /// Channel description (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Soft-delete flag. Excluded from public reads when set.
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Publish flag.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// When the channel was created.
    pub created: DateTimeUtc,

    /// When the channel was last modified.
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    #[sea_orm(has_many = "super::article::Entity")]
    Articles,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

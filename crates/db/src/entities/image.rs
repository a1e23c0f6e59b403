//! Image entity.
//!
//! Images are independent of the content hierarchy and are never traversed
//! by the article resolver; articles reference them by id/URL only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Image entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// Owning tenant.
    #[sea_orm(indexed)]
    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    /// Image URL.
    #[validate(length(min = 1))]
    pub url: String,

    /// Pixel height.
    #[sea_orm(default_value = 0)]
    pub height: i32,

    /// Pixel width.
    #[sea_orm(default_value = 0)]
    pub width: i32,

    /// Ordering hint for listings.
    #[sea_orm(default_value = 0)]
    pub display_order: i32,

    /// Soft-delete flag. Excluded from public reads when set.
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Publish flag.
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// When the image was created.
    pub created: DateTimeUtc,

    /// When the image was last modified.
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

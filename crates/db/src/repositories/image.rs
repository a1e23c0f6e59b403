//! Image repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{Image, image};

/// Repository for image operations. Images carry no perma name and take no
/// part in the hierarchy; lookups are by id only.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode) -> Select<Image> {
        let mut query = Image::find().filter(image::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query.filter(image::Column::IsDeleted.eq(false));
        }

        query
    }

    /// Find image by primary key, without tenant or visibility scoping.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find image by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<image::Model>> {
        Self::scoped(owner_id, mode)
            .filter(image::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List images of a tenant.
    pub async fn list(
        &self,
        owner_id: &str,
        mode: LookupMode,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<image::Model>> {
        Self::scoped(owner_id, mode)
            .order_by(image::Column::DisplayOrder, Order::Asc)
            .order_by(image::Column::Created, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count images of a tenant, before pagination.
    pub async fn count(&self, owner_id: &str, mode: LookupMode) -> AppResult<u64> {
        Self::scoped(owner_id, mode)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert an image, stamping created/modified.
    pub async fn insert(&self, item: image::Model, now: DateTime<Utc>) -> AppResult<image::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an image by primary key (full row, last writer wins),
    /// stamping modified.
    pub async fn update(&self, item: image::Model, now: DateTime<Utc>) -> AppResult<image::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete an image, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<image::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image not found: {id}")))?;

        Image::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete an image: set the flag, stamp modified, keep the row.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<image::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image not found: {id}")))?;

        let mut active: image::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn to_active(item: image::Model) -> image::ActiveModel {
    image::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        url: Set(item.url),
        height: Set(item.height),
        width: Set(item.width),
        display_order: Set(item.display_order),
        is_deleted: Set(item.is_deleted),
        is_published: Set(item.is_published),
        created: Set(item.created),
        modified: Set(item.modified),
    }
}

//! Sub-category repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{SubCategory, sub_category};

/// Repository for sub-category operations. Sub-categories live under a
/// (channel, category) pair; the perma name is only meaningful within it.
#[derive(Clone)]
pub struct SubCategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SubCategoryRepository {
    /// Create a new sub-category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode) -> Select<SubCategory> {
        let mut query = SubCategory::find().filter(sub_category::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query.filter(sub_category::Column::IsDeleted.eq(false));
        }

        query
    }

    /// Find sub-category by primary key, without tenant or visibility scoping.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<sub_category::Model>> {
        SubCategory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find sub-category by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<sub_category::Model>> {
        Self::scoped(owner_id, mode)
            .filter(sub_category::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find sub-category by perma name within (tenant, channel), optionally
    /// pinned to a category.
    ///
    /// The category is optional because an article path can name a
    /// sub-category without its category; the channel alone is then the
    /// narrowing scope.
    pub async fn find_by_perma_name(
        &self,
        owner_id: &str,
        channel_id: &str,
        category_id: Option<&str>,
        perma_name: &str,
        mode: LookupMode,
    ) -> AppResult<Option<sub_category::Model>> {
        let mut query = Self::scoped(owner_id, mode)
            .filter(sub_category::Column::ChannelId.eq(channel_id))
            .filter(sub_category::Column::PermaName.eq(perma_name));

        if let Some(category_id) = category_id {
            query = query.filter(sub_category::Column::CategoryId.eq(category_id));
        }

        query
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List sub-categories of a tenant, optionally narrowed to a channel
    /// and/or category and by a title keyword.
    pub async fn list(
        &self,
        owner_id: &str,
        channel_id: Option<&str>,
        category_id: Option<&str>,
        keyword: Option<&str>,
        mode: LookupMode,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<sub_category::Model>> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(channel_id) = channel_id {
            query = query.filter(sub_category::Column::ChannelId.eq(channel_id));
        }
        if let Some(category_id) = category_id {
            query = query.filter(sub_category::Column::CategoryId.eq(category_id));
        }
        if let Some(keyword) = keyword {
            query = query.filter(sub_category::Column::Title.contains(keyword));
        }

        query
            .order_by(sub_category::Column::DisplayOrder, Order::Asc)
            .order_by(sub_category::Column::Created, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count sub-categories matching the `list` filter, before pagination.
    pub async fn count(
        &self,
        owner_id: &str,
        channel_id: Option<&str>,
        category_id: Option<&str>,
        keyword: Option<&str>,
        mode: LookupMode,
    ) -> AppResult<u64> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(channel_id) = channel_id {
            query = query.filter(sub_category::Column::ChannelId.eq(channel_id));
        }
        if let Some(category_id) = category_id {
            query = query.filter(sub_category::Column::CategoryId.eq(category_id));
        }
        if let Some(keyword) = keyword {
            query = query.filter(sub_category::Column::Title.contains(keyword));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a perma name is already taken within (tenant, channel,
    /// category).
    pub async fn perma_name_taken(
        &self,
        owner_id: &str,
        channel_id: &str,
        category_id: &str,
        perma_name: &str,
    ) -> AppResult<bool> {
        let existing = SubCategory::find()
            .filter(sub_category::Column::OwnerId.eq(owner_id))
            .filter(sub_category::Column::ChannelId.eq(channel_id))
            .filter(sub_category::Column::CategoryId.eq(category_id))
            .filter(sub_category::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Insert a sub-category, stamping created/modified.
    pub async fn insert(
        &self,
        item: sub_category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a sub-category by primary key (full row, last writer wins),
    /// stamping modified.
    pub async fn update(
        &self,
        item: sub_category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete a sub-category, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<sub_category::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-category not found: {id}")))?;

        SubCategory::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete a sub-category: set the flag, stamp modified, keep
    /// the row.
    pub async fn soft_delete(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-category not found: {id}")))?;

        let mut active: sub_category::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn to_active(item: sub_category::Model) -> sub_category::ActiveModel {
    sub_category::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        name: Set(item.name),
        perma_name: Set(item.perma_name),
        channel_id: Set(item.channel_id),
        category_id: Set(item.category_id),
        display_order: Set(item.display_order),
        title: Set(item.title),
        description: Set(item.description),
        is_deleted: Set(item.is_deleted),
        is_published: Set(item.is_published),
        created: Set(item.created),
        modified: Set(item.modified),
    }
}

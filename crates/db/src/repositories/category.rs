//! Category repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{Category, category};

/// Repository for category operations. Categories live under a channel, and
/// the perma name is only meaningful within that channel.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode) -> Select<Category> {
        let mut query = Category::find().filter(category::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query.filter(category::Column::IsDeleted.eq(false));
        }

        query
    }

    /// Find category by primary key, without tenant or visibility scoping.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find category by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<category::Model>> {
        Self::scoped(owner_id, mode)
            .filter(category::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find category by perma name within (tenant, channel).
    pub async fn find_by_perma_name(
        &self,
        owner_id: &str,
        channel_id: &str,
        perma_name: &str,
        mode: LookupMode,
    ) -> AppResult<Option<category::Model>> {
        Self::scoped(owner_id, mode)
            .filter(category::Column::ChannelId.eq(channel_id))
            .filter(category::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List categories of a tenant, optionally narrowed to a channel and by
    /// a title keyword.
    pub async fn list(
        &self,
        owner_id: &str,
        channel_id: Option<&str>,
        keyword: Option<&str>,
        mode: LookupMode,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<category::Model>> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(channel_id) = channel_id {
            query = query.filter(category::Column::ChannelId.eq(channel_id));
        }
        if let Some(keyword) = keyword {
            query = query.filter(category::Column::Title.contains(keyword));
        }

        query
            .order_by(category::Column::DisplayOrder, Order::Asc)
            .order_by(category::Column::Created, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count categories matching the `list` filter, before pagination.
    pub async fn count(
        &self,
        owner_id: &str,
        channel_id: Option<&str>,
        keyword: Option<&str>,
        mode: LookupMode,
    ) -> AppResult<u64> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(channel_id) = channel_id {
            query = query.filter(category::Column::ChannelId.eq(channel_id));
        }
        if let Some(keyword) = keyword {
            query = query.filter(category::Column::Title.contains(keyword));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a perma name is already taken within (tenant, channel).
    pub async fn perma_name_taken(
        &self,
        owner_id: &str,
        channel_id: &str,
        perma_name: &str,
    ) -> AppResult<bool> {
        let existing = Category::find()
            .filter(category::Column::OwnerId.eq(owner_id))
            .filter(category::Column::ChannelId.eq(channel_id))
            .filter(category::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Insert a category, stamping created/modified.
    pub async fn insert(
        &self,
        item: category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<category::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a category by primary key (full row, last writer wins),
    /// stamping modified.
    pub async fn update(
        &self,
        item: category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<category::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete a category, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<category::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))?;

        Category::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete a category: set the flag, stamp modified, keep the row.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<category::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))?;

        let mut active: category::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn to_active(item: category::Model) -> category::ActiveModel {
    category::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        name: Set(item.name),
        perma_name: Set(item.perma_name),
        channel_id: Set(item.channel_id),
        display_order: Set(item.display_order),
        title: Set(item.title),
        description: Set(item.description),
        is_deleted: Set(item.is_deleted),
        is_published: Set(item.is_published),
        created: Set(item.created),
        modified: Set(item.modified),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_category(id: &str, channel_id: &str, perma_name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "Politics".to_string(),
            perma_name: perma_name.to_string(),
            channel_id: channel_id.to_string(),
            display_order: 0,
            title: Some("Politics".to_string()),
            description: None,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_by_perma_name_is_channel_scoped() {
        let category = create_test_category("cat1", "ch1", "politics");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[category.clone()]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let found = repo
            .find_by_perma_name("tenant1", "ch1", "politics", LookupMode::Public)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, "cat1");
        assert_eq!(found.channel_id, "ch1");
    }

    #[tokio::test]
    async fn test_perma_name_taken_with_different_channel_is_free() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);

        assert!(!repo
            .perma_name_taken("tenant1", "ch2", "politics")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_narrowed_by_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_category("cat1", "ch1", "politics"),
                    create_test_category("cat2", "ch1", "economy"),
                ]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let listed = repo
            .list("tenant1", Some("ch1"), None, LookupMode::Public, 10, 0)
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.soft_delete("missing", Utc::now()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

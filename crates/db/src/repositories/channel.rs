//! Channel repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{Channel, channel};

/// Repository for channel operations.
#[derive(Clone)]
pub struct ChannelRepository {
    db: Arc<DatabaseConnection>,
}

impl ChannelRepository {
    /// Create a new channel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode) -> Select<Channel> {
        let mut query = Channel::find().filter(channel::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query.filter(channel::Column::IsDeleted.eq(false));
        }

        query
    }

    /// Find channel by primary key, without tenant or visibility scoping.
    ///
    /// Used by the write path (insert-vs-update branching and referential
    /// validation of child rows).
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<channel::Model>> {
        Channel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find channel by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<channel::Model>> {
        Self::scoped(owner_id, mode)
            .filter(channel::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find channel by perma name within a tenant.
    pub async fn find_by_perma_name(
        &self,
        owner_id: &str,
        perma_name: &str,
        mode: LookupMode,
    ) -> AppResult<Option<channel::Model>> {
        Self::scoped(owner_id, mode)
            .filter(channel::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List channels of a tenant, optionally narrowed by a title keyword.
    pub async fn list(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        mode: LookupMode,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<channel::Model>> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(keyword) = keyword {
            query = query.filter(channel::Column::Title.contains(keyword));
        }

        query
            .order_by(channel::Column::DisplayOrder, Order::Asc)
            .order_by(channel::Column::Created, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count channels matching the `list` filter, before pagination.
    pub async fn count(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        mode: LookupMode,
    ) -> AppResult<u64> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(keyword) = keyword {
            query = query.filter(channel::Column::Title.contains(keyword));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a perma name is already taken within (tenant).
    ///
    /// Uniqueness is enforced here, before the write, not by a storage
    /// constraint.
    pub async fn perma_name_taken(&self, owner_id: &str, perma_name: &str) -> AppResult<bool> {
        let existing = Channel::find()
            .filter(channel::Column::OwnerId.eq(owner_id))
            .filter(channel::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Insert a channel, stamping created/modified.
    pub async fn insert(
        &self,
        item: channel::Model,
        now: DateTime<Utc>,
    ) -> AppResult<channel::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a channel by primary key (full row, last writer wins),
    /// stamping modified.
    pub async fn update(
        &self,
        item: channel::Model,
        now: DateTime<Utc>,
    ) -> AppResult<channel::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete a channel, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<channel::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Channel not found: {id}")))?;

        Channel::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete a channel: set the flag, stamp modified, keep the row.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<channel::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Channel not found: {id}")))?;

        let mut active: channel::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn to_active(item: channel::Model) -> channel::ActiveModel {
    channel::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        name: Set(item.name),
        perma_name: Set(item.perma_name),
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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_channel(id: &str, perma_name: &str, is_deleted: bool) -> channel::Model {
        channel::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "News".to_string(),
            perma_name: perma_name.to_string(),
            display_order: 0,
            title: Some("News".to_string()),
            description: None,
            is_deleted,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_by_perma_name_returns_channel() {
        let channel = create_test_channel("ch1", "news", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[channel.clone()]])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let found = repo
            .find_by_perma_name("tenant1", "news", LookupMode::Public)
            .await
            .unwrap();

        assert_eq!(found.unwrap().id, "ch1");
    }

    #[tokio::test]
    async fn test_find_by_perma_name_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let found = repo
            .find_by_perma_name("tenant1", "missing", LookupMode::Admin)
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_perma_name_taken() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_channel("ch1", "news", false)],
                    Vec::new(),
                ])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);

        assert!(repo.perma_name_taken("tenant1", "news").await.unwrap());
        assert!(!repo.perma_name_taken("tenant1", "sports").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_channels() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let count = repo.count("tenant1", None, LookupMode::Public).await.unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let channel = create_test_channel("ch1", "news", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[channel.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let removed = repo.delete("ch1").await.unwrap();

        assert_eq!(removed.id, "ch1");
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<channel::Model>::new()])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let result = repo.delete("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_sets_flag() {
        let channel = create_test_channel("ch1", "news", false);
        let mut deleted = channel.clone();
        deleted.is_deleted = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![channel], vec![deleted]])
                .into_connection(),
        );

        let repo = ChannelRepository::new(db);
        let updated = repo.soft_delete("ch1", Utc::now()).await.unwrap();

        assert!(updated.is_deleted);
    }
}

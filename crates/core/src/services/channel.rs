//! Channel service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::{AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::channel;
use newsroom_db::repositories::{ArticleListFilter, ArticleRepository, ChannelRepository, LookupMode};
use serde::Serialize;
use validator::Validate;

use super::upsert::{UpsertResponse, UpsertStore, WriteError, run_upsert};

/// A channel decorated with its article count for a locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelView {
    #[serde(flatten)]
    pub channel: channel::Model,
    pub article_count: u64,
}

/// Service for channel reads and writes.
#[derive(Clone)]
pub struct ChannelService {
    channels: ChannelRepository,
    articles: ArticleRepository,
    id_gen: IdGenerator,
}

impl ChannelService {
    /// Create a new channel service.
    #[must_use]
    pub const fn new(channels: ChannelRepository, articles: ArticleRepository) -> Self {
        Self {
            channels,
            articles,
            id_gen: IdGenerator::new(),
        }
    }

    /// List channels of a tenant, each decorated with its article count for
    /// the given locale.
    pub async fn list(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        culture: Option<&str>,
        page: &PageRequest,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Page<ChannelView>> {
        let total = self.channels.count(owner_id, keyword, mode).await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let rows = self
            .channels
            .list(owner_id, keyword, mode, page.limit(), page.offset())
            .await?;
        let counts = self
            .articles
            .counts_by_channel(owner_id, culture, mode, now.timestamp())
            .await?;

        let items = rows
            .into_iter()
            .map(|ch| {
                let article_count = counts.get(&ch.id).copied().unwrap_or(0);
                ChannelView {
                    channel: ch,
                    article_count,
                }
            })
            .collect();

        Ok(Page::assemble(items, page, total))
    }

    /// Get a channel by perma name, decorated with its article count.
    pub async fn get_by_perma_name(
        &self,
        owner_id: &str,
        perma_name: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ChannelView>> {
        let found = self
            .channels
            .find_by_perma_name(owner_id, perma_name, mode)
            .await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    /// Get a channel by id within a tenant, decorated with its article count.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ChannelView>> {
        let found = self.channels.find_scoped_by_id(owner_id, id, mode).await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    async fn decorate(
        &self,
        owner_id: &str,
        found: Option<channel::Model>,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ChannelView>> {
        let Some(ch) = found else {
            return Ok(None);
        };

        let filter = ArticleListFilter {
            channel_id: Some(ch.id.clone()),
            culture: culture.map(str::to_string),
            ..Default::default()
        };
        let article_count = self
            .articles
            .count(owner_id, &filter, mode, now.timestamp())
            .await?;

        Ok(Some(ChannelView {
            channel: ch,
            article_count,
        }))
    }

    /// Insert or update a channel.
    ///
    /// Channels have no parent references, so only field validation feeds
    /// the pre-write error list.
    pub async fn upsert(
        &self,
        mut item: channel::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<channel::Model> {
        let mut errors = Vec::new();

        if item.id.is_empty() {
            item.id = self.id_gen.generate();
        }
        if let Err(e) = item.validate() {
            errors.push(WriteError::new(e.to_string()));
        }

        let store = ChannelStore {
            channels: &self.channels,
        };
        run_upsert(&store, item, errors, now).await
    }

    /// Physically delete a channel, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<channel::Model> {
        self.channels.delete(id).await
    }

    /// Logically delete a channel, returning the flagged row.
    pub async fn delete_logical(&self, id: &str, now: DateTime<Utc>) -> AppResult<channel::Model> {
        self.channels.soft_delete(id, now).await
    }
}

struct ChannelStore<'a> {
    channels: &'a ChannelRepository,
}

#[async_trait]
impl UpsertStore for ChannelStore<'_> {
    type Item = channel::Model;

    fn id(item: &channel::Model) -> &str {
        &item.id
    }

    fn perma_name(item: &channel::Model) -> &str {
        &item.perma_name
    }

    async fn find_existing(&self, item: &channel::Model) -> AppResult<Option<channel::Model>> {
        self.channels.find_by_id(&item.id).await
    }

    async fn scope_is_free(&self, item: &channel::Model) -> AppResult<bool> {
        Ok(!self
            .channels
            .perma_name_taken(&item.owner_id, &item.perma_name)
            .await?)
    }

    async fn insert(&self, item: channel::Model, now: DateTime<Utc>) -> AppResult<channel::Model> {
        self.channels.insert(item, now).await
    }

    async fn update(&self, item: channel::Model, now: DateTime<Utc>) -> AppResult<channel::Model> {
        self.channels.update(item, now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::upsert::ResponseStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_channel(id: &str, perma_name: &str) -> channel::Model {
        channel::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "News".to_string(),
            perma_name: perma_name.to_string(),
            display_order: 0,
            title: Some("News".to_string()),
            description: None,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> ChannelService {
        let db = Arc::new(db);
        ChannelService::new(
            ChannelRepository::new(db.clone()),
            ArticleRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_get_decorates_with_article_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(5))
            }]])
            .into_connection();

        let service = service_with(db);
        let view = service
            .get_by_perma_name(
                "tenant1",
                "news",
                Some("en-US"),
                LookupMode::Public,
                Utc::now(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(view.channel.id, "ch1");
        assert_eq!(view.article_count, 5);
    }

    #[tokio::test]
    async fn test_get_missing_channel_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<channel::Model>::new()])
            .into_connection();

        let service = service_with(db);
        let view = service
            .get_by_perma_name("tenant1", "missing", None, LookupMode::Public, Utc::now())
            .await
            .unwrap();

        assert!(view.is_none());
    }

    #[tokio::test]
    async fn test_list_empty_tenant_returns_empty_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(0))
            }]])
            .into_connection();

        let service = service_with(db);
        let page = service
            .list(
                "tenant1",
                None,
                None,
                &PageRequest::new(1, 10),
                LookupMode::Public,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_upsert_insert_path() {
        let saved = create_test_channel("ch1", "news");

        // find-by-id miss, free scope, insert returning the row
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::new(), Vec::new(), vec![saved.clone()]])
            .into_connection();

        let service = service_with(db);
        let response = service
            .upsert(create_test_channel("ch1", "news"), Utc::now())
            .await;

        assert!(response.is_success());
        assert_eq!(response.item.id, "ch1");
    }

    #[tokio::test]
    async fn test_upsert_insert_collision_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::new(), vec![create_test_channel("other", "news")]])
            .into_connection();

        let service = service_with(db);
        let response = service
            .upsert(create_test_channel("ch1", "news"), Utc::now())
            .await;

        assert_eq!(response.status, ResponseStatus::BadRequest);
        assert!(response.errors[0].message.contains("not unique"));
    }

    #[tokio::test]
    async fn test_upsert_update_with_unchanged_perma_name_skips_guard() {
        let existing = create_test_channel("ch1", "news");
        let mut updated = existing.clone();
        updated.name = "World News".to_string();

        // Only two result sets: existing lookup and the update itself. A
        // guard query would consume the second set and fail the update.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing], vec![updated.clone()]])
            .into_connection();

        let service = service_with(db);
        let response = service.upsert(updated, Utc::now()).await;

        assert!(response.is_success());
        assert_eq!(response.item.name, "World News");
    }

    #[tokio::test]
    async fn test_upsert_invalid_item_is_rejected_without_store_access() {
        let mut invalid = create_test_channel("ch1", "news");
        invalid.name = String::new();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service_with(db);
        let response = service.upsert(invalid, Utc::now()).await;

        assert_eq!(response.status, ResponseStatus::BadRequest);
        assert!(!response.errors.is_empty());
    }
}

//! Category service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::{AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::category;
use newsroom_db::repositories::{
    ArticleListFilter, ArticleRepository, CategoryRepository, ChannelRepository, LookupMode,
};
use serde::Serialize;
use validator::Validate;

use super::upsert::{UpsertResponse, UpsertStore, WriteError, run_upsert};

/// A category decorated with its article count for a locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: category::Model,
    pub article_count: u64,
}

/// Service for category reads and writes.
#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
    channels: ChannelRepository,
    articles: ArticleRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(
        categories: CategoryRepository,
        channels: ChannelRepository,
        articles: ArticleRepository,
    ) -> Self {
        Self {
            categories,
            channels,
            articles,
            id_gen: IdGenerator::new(),
        }
    }

    /// List categories of a tenant, optionally narrowed to a channel by its
    /// perma name, each decorated with its article count for the locale.
    pub async fn list(
        &self,
        owner_id: &str,
        channel_perma_name: Option<&str>,
        keyword: Option<&str>,
        culture: Option<&str>,
        page: &PageRequest,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Page<CategoryView>> {
        let channel_id = match channel_perma_name {
            Some(perma) => {
                let Some(ch) = self
                    .channels
                    .find_by_perma_name(owner_id, perma, LookupMode::Admin)
                    .await?
                else {
                    return Ok(Page::empty(page));
                };
                Some(ch.id)
            }
            None => None,
        };

        let total = self
            .categories
            .count(owner_id, channel_id.as_deref(), keyword, mode)
            .await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let rows = self
            .categories
            .list(
                owner_id,
                channel_id.as_deref(),
                keyword,
                mode,
                page.limit(),
                page.offset(),
            )
            .await?;
        let counts = self
            .articles
            .counts_by_category(owner_id, culture, mode, now.timestamp())
            .await?;

        let items = rows
            .into_iter()
            .map(|cat| {
                let article_count = counts.get(&cat.id).copied().unwrap_or(0);
                CategoryView {
                    category: cat,
                    article_count,
                }
            })
            .collect();

        Ok(Page::assemble(items, page, total))
    }

    /// Get a category by its perma-name chain, decorated with its article
    /// count.
    pub async fn get_by_perma_name(
        &self,
        owner_id: &str,
        channel_perma_name: &str,
        perma_name: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<CategoryView>> {
        let Some(ch) = self
            .channels
            .find_by_perma_name(owner_id, channel_perma_name, LookupMode::Admin)
            .await?
        else {
            return Ok(None);
        };
        let found = self
            .categories
            .find_by_perma_name(owner_id, &ch.id, perma_name, mode)
            .await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    /// Get a category by id within a tenant, decorated with its article
    /// count.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<CategoryView>> {
        let found = self.categories.find_scoped_by_id(owner_id, id, mode).await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    async fn decorate(
        &self,
        owner_id: &str,
        found: Option<category::Model>,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<CategoryView>> {
        let Some(cat) = found else {
            return Ok(None);
        };

        let filter = ArticleListFilter {
            category_id: Some(cat.id.clone()),
            culture: culture.map(str::to_string),
            ..Default::default()
        };
        let article_count = self
            .articles
            .count(owner_id, &filter, mode, now.timestamp())
            .await?;

        Ok(Some(CategoryView {
            category: cat,
            article_count,
        }))
    }

    /// Insert or update a category.
    ///
    /// The parent channel must exist; a dangling reference rejects the
    /// write before any store mutation.
    pub async fn upsert(
        &self,
        mut item: category::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<category::Model> {
        let mut errors = Vec::new();

        if item.id.is_empty() {
            item.id = self.id_gen.generate();
        }
        if let Err(e) = item.validate() {
            errors.push(WriteError::new(e.to_string()));
        }

        match self.channels.find_by_id(&item.channel_id).await {
            Ok(Some(_)) => {}
            Ok(None) => errors.push(WriteError::new("Channel is not found")),
            Err(e) => errors.push(WriteError::new(e.to_string())),
        }

        let store = CategoryStore {
            categories: &self.categories,
        };
        run_upsert(&store, item, errors, now).await
    }

    /// Physically delete a category, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<category::Model> {
        self.categories.delete(id).await
    }

    /// Logically delete a category, returning the flagged row.
    pub async fn delete_logical(&self, id: &str, now: DateTime<Utc>) -> AppResult<category::Model> {
        self.categories.soft_delete(id, now).await
    }
}

struct CategoryStore<'a> {
    categories: &'a CategoryRepository,
}

#[async_trait]
impl UpsertStore for CategoryStore<'_> {
    type Item = category::Model;

    fn id(item: &category::Model) -> &str {
        &item.id
    }

    fn perma_name(item: &category::Model) -> &str {
        &item.perma_name
    }

    async fn find_existing(&self, item: &category::Model) -> AppResult<Option<category::Model>> {
        self.categories.find_by_id(&item.id).await
    }

    async fn scope_is_free(&self, item: &category::Model) -> AppResult<bool> {
        Ok(!self
            .categories
            .perma_name_taken(&item.owner_id, &item.channel_id, &item.perma_name)
            .await?)
    }

    async fn insert(&self, item: category::Model, now: DateTime<Utc>) -> AppResult<category::Model> {
        self.categories.insert(item, now).await
    }

    async fn update(&self, item: category::Model, now: DateTime<Utc>) -> AppResult<category::Model> {
        self.categories.update(item, now).await
    }
}

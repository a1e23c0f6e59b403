//! Sub-category service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::{AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::sub_category;
use newsroom_db::repositories::{
    ArticleListFilter, ArticleRepository, CategoryRepository, ChannelRepository, LookupMode,
    SubCategoryRepository,
};
use serde::Serialize;
use validator::Validate;

use super::upsert::{UpsertResponse, UpsertStore, WriteError, run_upsert};

/// A sub-category decorated with its article count for a locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryView {
    #[serde(flatten)]
    pub sub_category: sub_category::Model,
    pub article_count: u64,
}

/// Service for sub-category reads and writes.
#[derive(Clone)]
pub struct SubCategoryService {
    sub_categories: SubCategoryRepository,
    categories: CategoryRepository,
    channels: ChannelRepository,
    articles: ArticleRepository,
    id_gen: IdGenerator,
}

impl SubCategoryService {
    /// Create a new sub-category service.
    #[must_use]
    pub const fn new(
        sub_categories: SubCategoryRepository,
        categories: CategoryRepository,
        channels: ChannelRepository,
        articles: ArticleRepository,
    ) -> Self {
        Self {
            sub_categories,
            categories,
            channels,
            articles,
            id_gen: IdGenerator::new(),
        }
    }

    /// List sub-categories of a tenant, optionally narrowed by a
    /// channel/category perma-name chain, each decorated with its article
    /// count for the locale.
    pub async fn list(
        &self,
        owner_id: &str,
        channel_perma_name: Option<&str>,
        category_perma_name: Option<&str>,
        keyword: Option<&str>,
        culture: Option<&str>,
        page: &PageRequest,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Page<SubCategoryView>> {
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

        let category_id = match (category_perma_name, channel_id.as_deref()) {
            (Some(perma), Some(channel_id)) => {
                let Some(cat) = self
                    .categories
                    .find_by_perma_name(owner_id, channel_id, perma, LookupMode::Admin)
                    .await?
                else {
                    return Ok(Page::empty(page));
                };
                Some(cat.id)
            }
            // A category perma name without a channel cannot be scoped.
            (Some(_), None) => return Ok(Page::empty(page)),
            (None, _) => None,
        };

        let total = self
            .sub_categories
            .count(
                owner_id,
                channel_id.as_deref(),
                category_id.as_deref(),
                keyword,
                mode,
            )
            .await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let rows = self
            .sub_categories
            .list(
                owner_id,
                channel_id.as_deref(),
                category_id.as_deref(),
                keyword,
                mode,
                page.limit(),
                page.offset(),
            )
            .await?;
        let counts = self
            .articles
            .counts_by_sub_category(owner_id, culture, mode, now.timestamp())
            .await?;

        let items = rows
            .into_iter()
            .map(|sub| {
                let article_count = counts.get(&sub.id).copied().unwrap_or(0);
                SubCategoryView {
                    sub_category: sub,
                    article_count,
                }
            })
            .collect();

        Ok(Page::assemble(items, page, total))
    }

    /// Get a sub-category by its perma-name chain, decorated with its
    /// article count.
    pub async fn get_by_perma_name(
        &self,
        owner_id: &str,
        channel_perma_name: &str,
        category_perma_name: &str,
        perma_name: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SubCategoryView>> {
        let Some(ch) = self
            .channels
            .find_by_perma_name(owner_id, channel_perma_name, LookupMode::Admin)
            .await?
        else {
            return Ok(None);
        };
        let Some(cat) = self
            .categories
            .find_by_perma_name(owner_id, &ch.id, category_perma_name, LookupMode::Admin)
            .await?
        else {
            return Ok(None);
        };
        let found = self
            .sub_categories
            .find_by_perma_name(owner_id, &ch.id, Some(&cat.id), perma_name, mode)
            .await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    /// Get a sub-category by id within a tenant, decorated with its article
    /// count.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SubCategoryView>> {
        let found = self
            .sub_categories
            .find_scoped_by_id(owner_id, id, mode)
            .await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    async fn decorate(
        &self,
        owner_id: &str,
        found: Option<sub_category::Model>,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<SubCategoryView>> {
        let Some(sub) = found else {
            return Ok(None);
        };

        let filter = ArticleListFilter {
            sub_category_id: Some(sub.id.clone()),
            culture: culture.map(str::to_string),
            ..Default::default()
        };
        let article_count = self
            .articles
            .count(owner_id, &filter, mode, now.timestamp())
            .await?;

        Ok(Some(SubCategoryView {
            sub_category: sub,
            article_count,
        }))
    }

    /// Insert or update a sub-category.
    ///
    /// Both parent references must exist; each dangling one contributes its
    /// own error and the write is rejected before any store mutation.
    pub async fn upsert(
        &self,
        mut item: sub_category::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<sub_category::Model> {
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
        match self.categories.find_by_id(&item.category_id).await {
            Ok(Some(_)) => {}
            Ok(None) => errors.push(WriteError::new("Category is not found")),
            Err(e) => errors.push(WriteError::new(e.to_string())),
        }

        let store = SubCategoryStore {
            sub_categories: &self.sub_categories,
        };
        run_upsert(&store, item, errors, now).await
    }

    /// Physically delete a sub-category, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<sub_category::Model> {
        self.sub_categories.delete(id).await
    }

    /// Logically delete a sub-category, returning the flagged row.
    pub async fn delete_logical(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        self.sub_categories.soft_delete(id, now).await
    }
}

struct SubCategoryStore<'a> {
    sub_categories: &'a SubCategoryRepository,
}

#[async_trait]
impl UpsertStore for SubCategoryStore<'_> {
    type Item = sub_category::Model;

    fn id(item: &sub_category::Model) -> &str {
        &item.id
    }

    fn perma_name(item: &sub_category::Model) -> &str {
        &item.perma_name
    }

    async fn find_existing(
        &self,
        item: &sub_category::Model,
    ) -> AppResult<Option<sub_category::Model>> {
        self.sub_categories.find_by_id(&item.id).await
    }

    async fn scope_is_free(&self, item: &sub_category::Model) -> AppResult<bool> {
        Ok(!self
            .sub_categories
            .perma_name_taken(
                &item.owner_id,
                &item.channel_id,
                &item.category_id,
                &item.perma_name,
            )
            .await?)
    }

    async fn insert(
        &self,
        item: sub_category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        self.sub_categories.insert(item, now).await
    }

    async fn update(
        &self,
        item: sub_category::Model,
        now: DateTime<Utc>,
    ) -> AppResult<sub_category::Model> {
        self.sub_categories.update(item, now).await
    }
}

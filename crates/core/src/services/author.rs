//! Author service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::{AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::author;
use newsroom_db::repositories::{ArticleListFilter, ArticleRepository, AuthorRepository, LookupMode};
use serde::Serialize;
use validator::Validate;

use super::upsert::{UpsertResponse, UpsertStore, WriteError, run_upsert};

/// An author decorated with the count of their articles for a locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: author::Model,
    pub article_count: u64,
}

/// Service for author reads and writes.
#[derive(Clone)]
pub struct AuthorService {
    authors: AuthorRepository,
    articles: ArticleRepository,
    id_gen: IdGenerator,
}

impl AuthorService {
    /// Create a new author service.
    #[must_use]
    pub const fn new(authors: AuthorRepository, articles: ArticleRepository) -> Self {
        Self {
            authors,
            articles,
            id_gen: IdGenerator::new(),
        }
    }

    /// List authors of a tenant, each decorated with their article count
    /// for the given locale. The keyword matches the display name.
    pub async fn list(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        culture: Option<&str>,
        page: &PageRequest,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Page<AuthorView>> {
        let total = self.authors.count(owner_id, keyword, mode).await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let rows = self
            .authors
            .list(owner_id, keyword, mode, page.limit(), page.offset())
            .await?;
        let counts = self
            .articles
            .counts_by_author(owner_id, culture, mode, now.timestamp())
            .await?;

        let items = rows
            .into_iter()
            .map(|au| {
                let article_count = counts.get(&au.id).copied().unwrap_or(0);
                AuthorView {
                    author: au,
                    article_count,
                }
            })
            .collect();

        Ok(Page::assemble(items, page, total))
    }

    /// Get an author by perma name, decorated with their article count.
    pub async fn get_by_perma_name(
        &self,
        owner_id: &str,
        perma_name: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<AuthorView>> {
        let found = self
            .authors
            .find_by_perma_name(owner_id, perma_name, mode)
            .await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    /// Get an author by id within a tenant, decorated with their article
    /// count.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<AuthorView>> {
        let found = self.authors.find_scoped_by_id(owner_id, id, mode).await?;
        self.decorate(owner_id, found, culture, mode, now).await
    }

    async fn decorate(
        &self,
        owner_id: &str,
        found: Option<author::Model>,
        culture: Option<&str>,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<AuthorView>> {
        let Some(au) = found else {
            return Ok(None);
        };

        let filter = ArticleListFilter {
            author_id: Some(au.id.clone()),
            culture: culture.map(str::to_string),
            ..Default::default()
        };
        let article_count = self
            .articles
            .count(owner_id, &filter, mode, now.timestamp())
            .await?;

        Ok(Some(AuthorView {
            author: au,
            article_count,
        }))
    }

    /// Insert or update an author.
    pub async fn upsert(
        &self,
        mut item: author::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<author::Model> {
        let mut errors = Vec::new();

        if item.id.is_empty() {
            item.id = self.id_gen.generate();
        }
        if let Err(e) = item.validate() {
            errors.push(WriteError::new(e.to_string()));
        }

        let store = AuthorStore {
            authors: &self.authors,
        };
        run_upsert(&store, item, errors, now).await
    }

    /// Physically delete an author, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<author::Model> {
        self.authors.delete(id).await
    }

    /// Logically delete an author, returning the flagged row.
    pub async fn delete_logical(&self, id: &str, now: DateTime<Utc>) -> AppResult<author::Model> {
        self.authors.soft_delete(id, now).await
    }
}

struct AuthorStore<'a> {
    authors: &'a AuthorRepository,
}

#[async_trait]
impl UpsertStore for AuthorStore<'_> {
    type Item = author::Model;

    fn id(item: &author::Model) -> &str {
        &item.id
    }

    fn perma_name(item: &author::Model) -> &str {
        &item.perma_name
    }

    async fn find_existing(&self, item: &author::Model) -> AppResult<Option<author::Model>> {
        self.authors.find_by_id(&item.id).await
    }

    async fn scope_is_free(&self, item: &author::Model) -> AppResult<bool> {
        Ok(!self
            .authors
            .perma_name_taken(&item.owner_id, &item.perma_name)
            .await?)
    }

    async fn insert(&self, item: author::Model, now: DateTime<Utc>) -> AppResult<author::Model> {
        self.authors.insert(item, now).await
    }

    async fn update(&self, item: author::Model, now: DateTime<Utc>) -> AppResult<author::Model> {
        self.authors.update(item, now).await
    }
}

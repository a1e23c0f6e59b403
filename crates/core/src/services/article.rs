//! Article service and the hierarchical perma-name resolver.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::{article, author, category, channel, sub_category};
use newsroom_db::repositories::{
    ArticleListFilter, ArticleRepository, AuthorRepository, CategoryRepository, ChannelRepository,
    LookupMode, SubCategoryRepository,
};
use serde::Serialize;
use validator::Validate;

use super::upsert::{UpsertResponse, UpsertStore, WriteError, run_upsert};

/// Optional perma-name narrowing for article listings.
///
/// The channel is a hard precondition when given; category, sub-category
/// and author are best-effort narrowers whose absence simply yields zero
/// rows.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub channel: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub author: Option<String>,
    pub keyword: Option<String>,
}

/// An article decorated with the display fields of its parents.
///
/// Parent fields are optional: a dangling reference (possible after a
/// physical parent delete) leaves its decoration empty rather than failing
/// the read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: article::Model,
    pub channel_name: Option<String>,
    pub channel_perma_name: Option<String>,
    pub category_name: Option<String>,
    pub category_perma_name: Option<String>,
    pub sub_category_name: Option<String>,
    pub sub_category_perma_name: Option<String>,
    pub author_name: Option<String>,
    pub author_perma_name: Option<String>,
    pub author_icon_image_url: Option<String>,
}

impl ArticleView {
    fn assemble(
        item: article::Model,
        channel: Option<&channel::Model>,
        category: Option<&category::Model>,
        sub_category: Option<&sub_category::Model>,
        author: Option<&author::Model>,
    ) -> Self {
        Self {
            channel_name: channel.map(|c| c.name.clone()),
            channel_perma_name: channel.map(|c| c.perma_name.clone()),
            category_name: category.map(|c| c.name.clone()),
            category_perma_name: category.map(|c| c.perma_name.clone()),
            sub_category_name: sub_category.map(|s| s.name.clone()),
            sub_category_perma_name: sub_category.map(|s| s.perma_name.clone()),
            author_name: author.map(|a| a.name.clone()),
            author_perma_name: author.map(|a| a.perma_name.clone()),
            author_icon_image_url: author.and_then(|a| a.icon_image_url.clone()),
            article: item,
        }
    }
}

/// A parent id that matches no row. Primary keys are never empty, so
/// narrowing on it turns an unresolved best-effort filter into an empty
/// result instead of an error.
const NO_MATCH: &str = "";

/// Service for article reads and writes.
#[derive(Clone)]
pub struct ArticleService {
    articles: ArticleRepository,
    channels: ChannelRepository,
    categories: CategoryRepository,
    sub_categories: SubCategoryRepository,
    authors: AuthorRepository,
    id_gen: IdGenerator,
}

impl ArticleService {
    /// Create a new article service.
    #[must_use]
    pub const fn new(
        articles: ArticleRepository,
        channels: ChannelRepository,
        categories: CategoryRepository,
        sub_categories: SubCategoryRepository,
        authors: AuthorRepository,
    ) -> Self {
        Self {
            articles,
            channels,
            categories,
            sub_categories,
            authors,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a paginated article listing through the perma-name chain.
    ///
    /// An empty base set for the tenant/locale is reported as not-found
    /// ("there is no such article"), distinct from a filter that matches
    /// nothing, which returns an empty page. A channel perma name that does
    /// not resolve is also not-found; the other narrowers silently narrow
    /// to zero rows. Results are newest publish date first.
    pub async fn list(
        &self,
        owner_id: &str,
        query: &ArticleQuery,
        culture: &str,
        page: &PageRequest,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Page<ArticleView>> {
        let now_epoch = now.timestamp();

        let mut filter = ArticleListFilter {
            culture: Some(culture.to_string()),
            ..Default::default()
        };

        let base_total = self.articles.count(owner_id, &filter, mode, now_epoch).await?;
        if base_total == 0 {
            return Err(AppError::NotFound("There is no such article.".to_string()));
        }

        if let Some(channel_perma) = &query.channel {
            let channel = self
                .channels
                .find_by_perma_name(owner_id, channel_perma, LookupMode::Admin)
                .await?
                .ok_or_else(|| AppError::NotFound("There is no such channel.".to_string()))?;
            filter.channel_id = Some(channel.id);
        }

        if let Some(category_perma) = &query.category {
            let resolved = match filter.channel_id.as_deref() {
                Some(channel_id) => {
                    self.categories
                        .find_by_perma_name(owner_id, channel_id, category_perma, LookupMode::Admin)
                        .await?
                }
                None => None,
            };
            filter.category_id = Some(resolved.map_or_else(|| NO_MATCH.to_string(), |c| c.id));
        }

        if let Some(sub_category_perma) = &query.sub_category {
            let resolved = match filter.channel_id.as_deref() {
                Some(channel_id) => {
                    self.sub_categories
                        .find_by_perma_name(
                            owner_id,
                            channel_id,
                            filter.category_id.as_deref().filter(|id| !id.is_empty()),
                            sub_category_perma,
                            LookupMode::Admin,
                        )
                        .await?
                }
                None => None,
            };
            filter.sub_category_id = Some(resolved.map_or_else(|| NO_MATCH.to_string(), |s| s.id));
        }

        if let Some(author_perma) = &query.author {
            let resolved = self
                .authors
                .find_by_perma_name(owner_id, author_perma, LookupMode::Admin)
                .await?;
            filter.author_id = Some(resolved.map_or_else(|| NO_MATCH.to_string(), |a| a.id));
        }

        filter.keyword = query.keyword.clone();

        let total = self.articles.count(owner_id, &filter, mode, now_epoch).await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let items = self
            .articles
            .list(owner_id, &filter, mode, now_epoch, page.limit(), page.offset())
            .await?;
        let views = self.decorate(items).await?;

        Ok(Page::assemble(views, page, total))
    }

    /// Resolve a single article by its full perma-name chain and locale.
    ///
    /// All four segments must resolve; a miss anywhere yields `None`.
    pub async fn get_by_perma_name(
        &self,
        owner_id: &str,
        channel_perma_name: &str,
        category_perma_name: &str,
        sub_category_perma_name: &str,
        perma_name: &str,
        culture: &str,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ArticleView>> {
        let Some(channel) = self
            .channels
            .find_by_perma_name(owner_id, channel_perma_name, LookupMode::Admin)
            .await?
        else {
            return Ok(None);
        };
        let Some(category) = self
            .categories
            .find_by_perma_name(owner_id, &channel.id, category_perma_name, LookupMode::Admin)
            .await?
        else {
            return Ok(None);
        };
        let Some(sub_category) = self
            .sub_categories
            .find_by_perma_name(
                owner_id,
                &channel.id,
                Some(&category.id),
                sub_category_perma_name,
                LookupMode::Admin,
            )
            .await?
        else {
            return Ok(None);
        };

        let filter = ArticleListFilter {
            channel_id: Some(channel.id.clone()),
            category_id: Some(category.id.clone()),
            sub_category_id: Some(sub_category.id.clone()),
            culture: Some(culture.to_string()),
            ..Default::default()
        };

        let Some(item) = self
            .articles
            .find_by_perma_name(owner_id, &filter, perma_name, mode, now.timestamp())
            .await?
        else {
            return Ok(None);
        };

        // The chain is already resolved; only the author is still missing.
        let author = self.authors.find_by_id(&item.author_id).await?;

        Ok(Some(ArticleView::assemble(
            item,
            Some(&channel),
            Some(&category),
            Some(&sub_category),
            author.as_ref(),
        )))
    }

    /// Get an article by id within a tenant.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ArticleView>> {
        let Some(item) = self
            .articles
            .find_scoped_by_id(owner_id, id, mode, now.timestamp())
            .await?
        else {
            return Ok(None);
        };

        let mut views = self.decorate(vec![item]).await?;
        Ok(views.pop())
    }

    /// Decorate articles with their parents' display fields, fetching each
    /// distinct parent once.
    async fn decorate(&self, items: Vec<article::Model>) -> AppResult<Vec<ArticleView>> {
        let mut channels: HashMap<String, Option<channel::Model>> = HashMap::new();
        let mut categories: HashMap<String, Option<category::Model>> = HashMap::new();
        let mut sub_categories: HashMap<String, Option<sub_category::Model>> = HashMap::new();
        let mut authors: HashMap<String, Option<author::Model>> = HashMap::new();

        let mut views = Vec::with_capacity(items.len());

        for item in items {
            if !channels.contains_key(&item.channel_id) {
                let found = self.channels.find_by_id(&item.channel_id).await?;
                channels.insert(item.channel_id.clone(), found);
            }
            if !categories.contains_key(&item.category_id) {
                let found = self.categories.find_by_id(&item.category_id).await?;
                categories.insert(item.category_id.clone(), found);
            }
            if !sub_categories.contains_key(&item.sub_category_id) {
                let found = self.sub_categories.find_by_id(&item.sub_category_id).await?;
                sub_categories.insert(item.sub_category_id.clone(), found);
            }
            if !authors.contains_key(&item.author_id) {
                let found = self.authors.find_by_id(&item.author_id).await?;
                authors.insert(item.author_id.clone(), found);
            }

            let channel = channels.get(&item.channel_id).and_then(Option::as_ref);
            let category = categories.get(&item.category_id).and_then(Option::as_ref);
            let sub_category = sub_categories
                .get(&item.sub_category_id)
                .and_then(Option::as_ref);
            let author = authors.get(&item.author_id).and_then(Option::as_ref);

            views.push(ArticleView::assemble(
                item,
                channel,
                category,
                sub_category,
                author,
            ));
        }

        Ok(views)
    }

    /// Insert or update an article.
    ///
    /// All four parent references must exist; every dangling one
    /// contributes its own error and the write is rejected before any
    /// store mutation. The cover image reference is not checked — it is
    /// denormalized onto the article at write time by the caller.
    pub async fn upsert(
        &self,
        mut item: article::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<article::Model> {
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
        match self.sub_categories.find_by_id(&item.sub_category_id).await {
            Ok(Some(_)) => {}
            Ok(None) => errors.push(WriteError::new("Sub category is not found")),
            Err(e) => errors.push(WriteError::new(e.to_string())),
        }
        match self.authors.find_by_id(&item.author_id).await {
            Ok(Some(_)) => {}
            Ok(None) => errors.push(WriteError::new("Author is not found")),
            Err(e) => errors.push(WriteError::new(e.to_string())),
        }

        let store = ArticleStore {
            articles: &self.articles,
        };
        run_upsert(&store, item, errors, now).await
    }

    /// Physically delete an article, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<article::Model> {
        self.articles.delete(id).await
    }

    /// Logically delete an article, returning the flagged row.
    pub async fn delete_logical(&self, id: &str, now: DateTime<Utc>) -> AppResult<article::Model> {
        self.articles.soft_delete(id, now).await
    }
}

struct ArticleStore<'a> {
    articles: &'a ArticleRepository,
}

#[async_trait]
impl UpsertStore for ArticleStore<'_> {
    type Item = article::Model;

    fn id(item: &article::Model) -> &str {
        &item.id
    }

    fn perma_name(item: &article::Model) -> &str {
        &item.perma_name
    }

    async fn find_existing(&self, item: &article::Model) -> AppResult<Option<article::Model>> {
        self.articles.find_by_id(&item.id).await
    }

    async fn scope_is_free(&self, item: &article::Model) -> AppResult<bool> {
        Ok(!self
            .articles
            .perma_name_taken(
                &item.owner_id,
                &item.channel_id,
                &item.category_id,
                &item.sub_category_id,
                &item.culture,
                &item.perma_name,
            )
            .await?)
    }

    async fn insert(&self, item: article::Model, now: DateTime<Utc>) -> AppResult<article::Model> {
        self.articles.insert(item, now).await
    }

    async fn update(&self, item: article::Model, now: DateTime<Utc>) -> AppResult<article::Model> {
        self.articles.update(item, now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::upsert::ResponseStatus;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_channel(id: &str, perma_name: &str) -> channel::Model {
        channel::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "News".to_string(),
            perma_name: perma_name.to_string(),
            display_order: 0,
            title: None,
            description: None,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn create_test_category(id: &str, perma_name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "Sports".to_string(),
            perma_name: perma_name.to_string(),
            channel_id: "ch1".to_string(),
            display_order: 0,
            title: None,
            description: None,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn create_test_sub_category(id: &str, perma_name: &str) -> sub_category::Model {
        sub_category::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            name: "Football".to_string(),
            perma_name: perma_name.to_string(),
            channel_id: "ch1".to_string(),
            category_id: "cat1".to_string(),
            display_order: 0,
            title: None,
            description: None,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn create_test_author(id: &str) -> author::Model {
        author::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            perma_name: "jane-doe".to_string(),
            name: "Jane Doe".to_string(),
            alter_name: None,
            description: None,
            icon_image_url: None,
            display_order: 0,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn create_test_article(id: &str, perma_name: &str) -> article::Model {
        let publish = Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap();
        let expire = Utc.with_ymd_and_hms(2031, 4, 1, 0, 0, 0).unwrap();

        article::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            title: "Matchday report".to_string(),
            description: None,
            text: Some("Full text".to_string()),
            markdown_text: None,
            url: None,
            publish,
            publish_unixtime: publish.timestamp(),
            expire,
            expire_unixtime: expire.timestamp(),
            image_id: None,
            image_url: None,
            tags: None,
            channel_id: "ch1".to_string(),
            category_id: "cat1".to_string(),
            sub_category_id: "sub1".to_string(),
            author_id: "au1".to_string(),
            culture: "en-US".to_string(),
            perma_name: perma_name.to_string(),
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }]
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> ArticleService {
        let db = Arc::new(db);
        ArticleService::new(
            ArticleRepository::new(db.clone()),
            ChannelRepository::new(db.clone()),
            CategoryRepository::new(db.clone()),
            SubCategoryRepository::new(db.clone()),
            AuthorRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_list_empty_base_set_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(0)])
            .into_connection();

        let service = service_with(db);
        let result = service
            .list(
                "tenant1",
                &ArticleQuery::default(),
                "en-US",
                &PageRequest::new(1, 10),
                LookupMode::Public,
                Utc::now(),
            )
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "There is no such article."),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_missing_channel_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(3)])
            .append_query_results([Vec::<channel::Model>::new()])
            .into_connection();

        let query = ArticleQuery {
            channel: Some("missing".to_string()),
            ..Default::default()
        };

        let service = service_with(db);
        let result = service
            .list(
                "tenant1",
                &query,
                "en-US",
                &PageRequest::new(1, 10),
                LookupMode::Public,
                Utc::now(),
            )
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "There is no such channel."),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_unresolved_category_yields_empty_page() {
        // base count, channel hit, category miss, narrowed count of zero
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(3)])
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([Vec::<category::Model>::new()])
            .append_query_results([count_result(0)])
            .into_connection();

        let query = ArticleQuery {
            channel: Some("news".to_string()),
            category: Some("nope".to_string()),
            ..Default::default()
        };

        let service = service_with(db);
        let page = service
            .list(
                "tenant1",
                &query,
                "en-US",
                &PageRequest::new(1, 10),
                LookupMode::Public,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_list_paginates_and_decorates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(10), count_result(10)])
            .append_query_results([vec![
                create_test_article("ar2", "later"),
                create_test_article("ar1", "earlier"),
            ]])
            // both articles share the same parents, fetched once each
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([[create_test_category("cat1", "sports")]])
            .append_query_results([[create_test_sub_category("sub1", "football")]])
            .append_query_results([[create_test_author("au1")]])
            .into_connection();

        let service = service_with(db);
        let page = service
            .list(
                "tenant1",
                &ArticleQuery::default(),
                "en-US",
                &PageRequest::new(1, 10),
                LookupMode::Admin,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(page.total_items, 10);
        // Known page-count quirk: an exact multiple reports one extra page.
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].article.id, "ar2");
        assert_eq!(page.items[0].channel_name.as_deref(), Some("News"));
        assert_eq!(page.items[1].author_perma_name.as_deref(), Some("jane-doe"));
    }

    #[tokio::test]
    async fn test_get_by_perma_name_walks_the_full_chain() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([[create_test_category("cat1", "sports")]])
            .append_query_results([[create_test_sub_category("sub1", "football")]])
            .append_query_results([[create_test_article("ar1", "matchday")]])
            .append_query_results([[create_test_author("au1")]])
            .into_connection();

        let service = service_with(db);
        let found = service
            .get_by_perma_name(
                "tenant1",
                "news",
                "sports",
                "football",
                "matchday",
                "en-US",
                LookupMode::Public,
                Utc::now(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.article.id, "ar1");
        assert_eq!(found.category_perma_name.as_deref(), Some("sports"));
        assert_eq!(found.author_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_get_by_perma_name_broken_segment_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let service = service_with(db);
        let found = service
            .get_by_perma_name(
                "tenant1",
                "news",
                "wrong",
                "football",
                "matchday",
                "en-US",
                LookupMode::Public,
                Utc::now(),
            )
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_missing_category_is_rejected_without_write() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([Vec::<category::Model>::new()])
            .append_query_results([[create_test_sub_category("sub1", "football")]])
            .append_query_results([[create_test_author("au1")]])
            .into_connection();

        let service = service_with(db);
        let response = service
            .upsert(create_test_article("ar1", "matchday"), Utc::now())
            .await;

        assert_eq!(response.status, ResponseStatus::BadRequest);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Category is not found");
        assert_eq!(response.errors[0].code, 500);
    }

    #[tokio::test]
    async fn test_upsert_insert_path() {
        let saved = create_test_article("ar1", "matchday");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_channel("ch1", "news")]])
            .append_query_results([[create_test_category("cat1", "sports")]])
            .append_query_results([[create_test_sub_category("sub1", "football")]])
            .append_query_results([[create_test_author("au1")]])
            // existing miss, guard miss, insert returning the row
            .append_query_results([Vec::new(), Vec::new(), vec![saved.clone()]])
            .into_connection();

        let service = service_with(db);
        let response = service
            .upsert(create_test_article("ar1", "matchday"), Utc::now())
            .await;

        assert!(response.is_success());
        assert_eq!(response.item.id, "ar1");
    }
}

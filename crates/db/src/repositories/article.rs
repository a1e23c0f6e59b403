//! Article repository.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{Article, article};

/// Optional narrowing applied to article listings and perma-name lookups.
///
/// Every field is independent; unset fields leave the query unrestricted.
/// The keyword matches the article title as a substring.
#[derive(Debug, Clone, Default)]
pub struct ArticleListFilter {
    pub channel_id: Option<String>,
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub author_id: Option<String>,
    pub culture: Option<String>,
    pub keyword: Option<String>,
}

/// Repository for article operations.
///
/// Public reads apply the full visibility rule: not soft-deleted, and the
/// epoch snapshot `now` lies strictly inside the publish/expire window.
#[derive(Clone)]
pub struct ArticleRepository {
    db: Arc<DatabaseConnection>,
}

impl ArticleRepository {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode, now: i64) -> Select<Article> {
        let mut query = Article::find().filter(article::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query
                .filter(article::Column::IsDeleted.eq(false))
                .filter(article::Column::PublishUnixtime.lt(now))
                .filter(article::Column::ExpireUnixtime.gt(now));
        }

        query
    }

    fn apply_filter(mut query: Select<Article>, filter: &ArticleListFilter) -> Select<Article> {
        if let Some(channel_id) = &filter.channel_id {
            query = query.filter(article::Column::ChannelId.eq(channel_id));
        }
        if let Some(category_id) = &filter.category_id {
            query = query.filter(article::Column::CategoryId.eq(category_id));
        }
        if let Some(sub_category_id) = &filter.sub_category_id {
            query = query.filter(article::Column::SubCategoryId.eq(sub_category_id));
        }
        if let Some(author_id) = &filter.author_id {
            query = query.filter(article::Column::AuthorId.eq(author_id));
        }
        if let Some(culture) = &filter.culture {
            query = query.filter(article::Column::Culture.eq(culture));
        }
        if let Some(keyword) = &filter.keyword {
            query = query.filter(article::Column::Title.contains(keyword));
        }

        query
    }

    /// Find article by primary key, without tenant or visibility scoping.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<article::Model>> {
        Article::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find article by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<Option<article::Model>> {
        Self::scoped(owner_id, mode, now)
            .filter(article::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find article by perma name under the given narrowing filter.
    pub async fn find_by_perma_name(
        &self,
        owner_id: &str,
        filter: &ArticleListFilter,
        perma_name: &str,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<Option<article::Model>> {
        let query = Self::apply_filter(Self::scoped(owner_id, mode, now), filter)
            .filter(article::Column::PermaName.eq(perma_name));

        query
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List articles of a tenant under a narrowing filter, newest publish
    /// date first.
    pub async fn list(
        &self,
        owner_id: &str,
        filter: &ArticleListFilter,
        mode: LookupMode,
        now: i64,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<article::Model>> {
        Self::apply_filter(Self::scoped(owner_id, mode, now), filter)
            .order_by(article::Column::PublishUnixtime, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count articles matching the `list` filter, before pagination.
    pub async fn count(
        &self,
        owner_id: &str,
        filter: &ArticleListFilter,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<u64> {
        Self::apply_filter(Self::scoped(owner_id, mode, now), filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a perma name is already taken within
    /// (tenant, channel, category, sub-category, culture).
    pub async fn perma_name_taken(
        &self,
        owner_id: &str,
        channel_id: &str,
        category_id: &str,
        sub_category_id: &str,
        culture: &str,
        perma_name: &str,
    ) -> AppResult<bool> {
        let existing = Article::find()
            .filter(article::Column::OwnerId.eq(owner_id))
            .filter(article::Column::ChannelId.eq(channel_id))
            .filter(article::Column::CategoryId.eq(category_id))
            .filter(article::Column::SubCategoryId.eq(sub_category_id))
            .filter(article::Column::Culture.eq(culture))
            .filter(article::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Article counts grouped by one of the parent reference columns,
    /// computed by the database rather than by loading rows.
    async fn counts_grouped(
        &self,
        owner_id: &str,
        group_column: article::Column,
        culture: Option<&str>,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<HashMap<String, u64>> {
        let mut query = Self::scoped(owner_id, mode, now);

        if let Some(culture) = culture {
            query = query.filter(article::Column::Culture.eq(culture));
        }

        let rows: Vec<(String, i64)> = query
            .select_only()
            .column(group_column)
            .column_as(article::Column::Id.count(), "num_items")
            .group_by(group_column)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    /// Article counts per channel id.
    pub async fn counts_by_channel(
        &self,
        owner_id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<HashMap<String, u64>> {
        self.counts_grouped(owner_id, article::Column::ChannelId, culture, mode, now)
            .await
    }

    /// Article counts per category id.
    pub async fn counts_by_category(
        &self,
        owner_id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<HashMap<String, u64>> {
        self.counts_grouped(owner_id, article::Column::CategoryId, culture, mode, now)
            .await
    }

    /// Article counts per sub-category id.
    pub async fn counts_by_sub_category(
        &self,
        owner_id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<HashMap<String, u64>> {
        self.counts_grouped(owner_id, article::Column::SubCategoryId, culture, mode, now)
            .await
    }

    /// Article counts per author id.
    pub async fn counts_by_author(
        &self,
        owner_id: &str,
        culture: Option<&str>,
        mode: LookupMode,
        now: i64,
    ) -> AppResult<HashMap<String, u64>> {
        self.counts_grouped(owner_id, article::Column::AuthorId, culture, mode, now)
            .await
    }

    /// Insert an article, stamping created/modified and deriving the epoch
    /// columns from the window timestamps.
    pub async fn insert(
        &self,
        item: article::Model,
        now: DateTime<Utc>,
    ) -> AppResult<article::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an article by primary key (full row, last writer wins),
    /// stamping modified and re-deriving the epoch columns.
    pub async fn update(
        &self,
        item: article::Model,
        now: DateTime<Utc>,
    ) -> AppResult<article::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete an article, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<article::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article not found: {id}")))?;

        Article::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete an article: set the flag, stamp modified, keep the
    /// row.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<article::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article not found: {id}")))?;

        let mut active: article::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Full-row active model. The epoch columns are always rewritten from the
/// window timestamps, so callers cannot desynchronize them.
fn to_active(item: article::Model) -> article::ActiveModel {
    let publish_unixtime = item.publish.timestamp();
    let expire_unixtime = item.expire.timestamp();

    article::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        title: Set(item.title),
        description: Set(item.description),
        text: Set(item.text),
        markdown_text: Set(item.markdown_text),
        url: Set(item.url),
        publish: Set(item.publish),
        publish_unixtime: Set(publish_unixtime),
        expire: Set(item.expire),
        expire_unixtime: Set(expire_unixtime),
        image_id: Set(item.image_id),
        image_url: Set(item.image_url),
        tags: Set(item.tags),
        channel_id: Set(item.channel_id),
        category_id: Set(item.category_id),
        sub_category_id: Set(item.sub_category_id),
        author_id: Set(item.author_id),
        culture: Set(item.culture),
        perma_name: Set(item.perma_name),
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
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_article(id: &str, perma_name: &str) -> article::Model {
        let publish = Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap();
        let expire = Utc.with_ymd_and_hms(2031, 4, 1, 0, 0, 0).unwrap();

        article::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            title: "Election results".to_string(),
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

    #[tokio::test]
    async fn test_find_by_perma_name_under_filter() {
        let article = create_test_article("ar1", "election-results");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article.clone()]])
                .into_connection(),
        );

        let filter = ArticleListFilter {
            channel_id: Some("ch1".to_string()),
            culture: Some("en-US".to_string()),
            ..Default::default()
        };

        let repo = ArticleRepository::new(db);
        let found = repo
            .find_by_perma_name(
                "tenant1",
                &filter,
                "election-results",
                LookupMode::Public,
                Utc::now().timestamp(),
            )
            .await
            .unwrap();

        assert_eq!(found.unwrap().id, "ar1");
    }

    #[tokio::test]
    async fn test_list_returns_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_article("ar2", "later"),
                    create_test_article("ar1", "earlier"),
                ]])
                .into_connection(),
        );

        let repo = ArticleRepository::new(db);
        let listed = repo
            .list(
                "tenant1",
                &ArticleListFilter::default(),
                LookupMode::Admin,
                Utc::now().timestamp(),
                10,
                0,
            )
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "ar2");
    }

    #[tokio::test]
    async fn test_count_articles() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(12))
                }]])
                .into_connection(),
        );

        let repo = ArticleRepository::new(db);
        let count = repo
            .count(
                "tenant1",
                &ArticleListFilter::default(),
                LookupMode::Public,
                Utc::now().timestamp(),
            )
            .await
            .unwrap();

        assert_eq!(count, 12);
    }

    #[tokio::test]
    async fn test_counts_by_channel_groups_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    maplit::btreemap! {
                        "channel_id" => sea_orm::Value::String(Some(Box::new("ch1".to_string()))),
                        "num_items" => sea_orm::Value::BigInt(Some(4)),
                    },
                    maplit::btreemap! {
                        "channel_id" => sea_orm::Value::String(Some(Box::new("ch2".to_string()))),
                        "num_items" => sea_orm::Value::BigInt(Some(1)),
                    },
                ]])
                .into_connection(),
        );

        let repo = ArticleRepository::new(db);
        let counts = repo
            .counts_by_channel(
                "tenant1",
                Some("en-US"),
                LookupMode::Public,
                Utc::now().timestamp(),
            )
            .await
            .unwrap();

        assert_eq!(counts.get("ch1"), Some(&4));
        assert_eq!(counts.get("ch2"), Some(&1));
        assert_eq!(counts.get("ch3"), None);
    }

    #[tokio::test]
    async fn test_perma_name_taken_in_full_scope() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_article("ar1", "election-results")]])
                .into_connection(),
        );

        let repo = ArticleRepository::new(db);

        assert!(repo
            .perma_name_taken(
                "tenant1",
                "ch1",
                "cat1",
                "sub1",
                "en-US",
                "election-results"
            )
            .await
            .unwrap());
    }

    #[test]
    fn test_to_active_rederives_epoch_columns() {
        let mut article = create_test_article("ar1", "election-results");
        article.publish_unixtime = 0;
        article.expire_unixtime = 0;

        let active = to_active(article.clone());

        assert_eq!(
            active.publish_unixtime,
            Set(article.publish.timestamp())
        );
        assert_eq!(active.expire_unixtime, Set(article.expire.timestamp()));
    }

    #[tokio::test]
    async fn test_soft_delete_sets_flag() {
        let article = create_test_article("ar1", "election-results");
        let mut deleted = article.clone();
        deleted.is_deleted = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![article], vec![deleted]])
                .into_connection(),
        );

        let repo = ArticleRepository::new(db);
        let updated = repo.soft_delete("ar1", Utc::now()).await.unwrap();

        assert!(updated.is_deleted);
    }
}

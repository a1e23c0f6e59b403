//! Author repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use newsroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::LookupMode;
use crate::entities::{Author, author};

/// Repository for author operations. Authors sit outside the channel
/// hierarchy; perma names are unique per tenant.
#[derive(Clone)]
pub struct AuthorRepository {
    db: Arc<DatabaseConnection>,
}

impl AuthorRepository {
    /// Create a new author repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(owner_id: &str, mode: LookupMode) -> Select<Author> {
        let mut query = Author::find().filter(author::Column::OwnerId.eq(owner_id));

        if mode.is_public() {
            query = query.filter(author::Column::IsDeleted.eq(false));
        }

        query
    }

    /// Find author by primary key, without tenant or visibility scoping.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<author::Model>> {
        Author::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find author by id within a tenant.
    pub async fn find_scoped_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<author::Model>> {
        Self::scoped(owner_id, mode)
            .filter(author::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find author by perma name within a tenant.
    pub async fn find_by_perma_name(
        &self,
        owner_id: &str,
        perma_name: &str,
        mode: LookupMode,
    ) -> AppResult<Option<author::Model>> {
        Self::scoped(owner_id, mode)
            .filter(author::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List authors of a tenant, optionally narrowed by a name keyword.
    ///
    /// The keyword matches the display name, not the title: authors have
    /// no title column.
    pub async fn list(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        mode: LookupMode,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<author::Model>> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(keyword) = keyword {
            query = query.filter(author::Column::Name.contains(keyword));
        }

        query
            .order_by(author::Column::DisplayOrder, Order::Asc)
            .order_by(author::Column::Created, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count authors matching the `list` filter, before pagination.
    pub async fn count(
        &self,
        owner_id: &str,
        keyword: Option<&str>,
        mode: LookupMode,
    ) -> AppResult<u64> {
        let mut query = Self::scoped(owner_id, mode);

        if let Some(keyword) = keyword {
            query = query.filter(author::Column::Name.contains(keyword));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a perma name is already taken within a tenant.
    pub async fn perma_name_taken(&self, owner_id: &str, perma_name: &str) -> AppResult<bool> {
        let existing = Author::find()
            .filter(author::Column::OwnerId.eq(owner_id))
            .filter(author::Column::PermaName.eq(perma_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Insert an author, stamping created/modified.
    pub async fn insert(
        &self,
        item: author::Model,
        now: DateTime<Utc>,
    ) -> AppResult<author::Model> {
        let mut active = to_active(item);
        active.created = Set(now);
        active.modified = Set(now);

        active
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an author by primary key (full row, last writer wins),
    /// stamping modified.
    pub async fn update(
        &self,
        item: author::Model,
        now: DateTime<Utc>,
    ) -> AppResult<author::Model> {
        let mut active = to_active(item);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Physically delete an author, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<author::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author not found: {id}")))?;

        Author::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(original)
    }

    /// Logically delete an author: set the flag, stamp modified, keep the row.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<author::Model> {
        let original = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author not found: {id}")))?;

        let mut active: author::ActiveModel = original.into();
        active.is_deleted = Set(true);
        active.modified = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn to_active(item: author::Model) -> author::ActiveModel {
    author::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        perma_name: Set(item.perma_name),
        name: Set(item.name),
        alter_name: Set(item.alter_name),
        description: Set(item.description),
        icon_image_url: Set(item.icon_image_url),
        display_order: Set(item.display_order),
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

    fn create_test_author(id: &str, name: &str) -> author::Model {
        author::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            perma_name: "jane-doe".to_string(),
            name: name.to_string(),
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

    #[tokio::test]
    async fn test_find_by_perma_name_returns_author() {
        let author = create_test_author("au1", "Jane Doe");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author.clone()]])
                .into_connection(),
        );

        let repo = AuthorRepository::new(db);
        let found = repo
            .find_by_perma_name("tenant1", "jane-doe", LookupMode::Public)
            .await
            .unwrap();

        assert_eq!(found.unwrap().id, "au1");
    }

    #[tokio::test]
    async fn test_list_with_name_keyword() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_author("au1", "Jane Doe")]])
                .into_connection(),
        );

        let repo = AuthorRepository::new(db);
        let listed = repo
            .list("tenant1", Some("Jane"), LookupMode::Public, 10, 0)
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_sets_flag() {
        let author = create_test_author("au1", "Jane Doe");
        let mut deleted = author.clone();
        deleted.is_deleted = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![author], vec![deleted]])
                .into_connection(),
        );

        let repo = AuthorRepository::new(db);
        let updated = repo.soft_delete("au1", Utc::now()).await.unwrap();

        assert!(updated.is_deleted);
    }
}

//! Image service.

use chrono::{DateTime, Utc};
use newsroom_common::{AppResult, IdGenerator, Page, PageRequest};
use newsroom_db::entities::image;
use newsroom_db::repositories::{ImageRepository, LookupMode};
use validator::Validate;

use super::upsert::{ResponseStatus, UpsertResponse, WriteError};

/// Service for image reads and writes.
///
/// Images carry no perma name, so writes skip the uniqueness guard: the
/// save branches on the primary key and folds faults into the same envelope
/// the other kinds use.
#[derive(Clone)]
pub struct ImageService {
    images: ImageRepository,
    id_gen: IdGenerator,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub const fn new(images: ImageRepository) -> Self {
        Self {
            images,
            id_gen: IdGenerator::new(),
        }
    }

    /// List images of a tenant.
    pub async fn list(
        &self,
        owner_id: &str,
        page: &PageRequest,
        mode: LookupMode,
    ) -> AppResult<Page<image::Model>> {
        let total = self.images.count(owner_id, mode).await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }

        let items = self
            .images
            .list(owner_id, mode, page.limit(), page.offset())
            .await?;

        Ok(Page::assemble(items, page, total))
    }

    /// Get an image by id within a tenant.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
        mode: LookupMode,
    ) -> AppResult<Option<image::Model>> {
        self.images.find_scoped_by_id(owner_id, id, mode).await
    }

    /// Insert or update an image.
    pub async fn upsert(
        &self,
        mut item: image::Model,
        now: DateTime<Utc>,
    ) -> UpsertResponse<image::Model> {
        let mut errors = Vec::new();

        if item.id.is_empty() {
            item.id = self.id_gen.generate();
        }
        if let Err(e) = item.validate() {
            errors.push(WriteError::new(e.to_string()));
        }

        if errors.is_empty() {
            let existing = match self.images.find_by_id(&item.id).await {
                Ok(found) => found,
                Err(e) => {
                    errors.push(WriteError::new(e.to_string()));
                    None
                }
            };

            if errors.is_empty() {
                let written = match existing {
                    None => self.images.insert(item.clone(), now).await,
                    Some(_) => self.images.update(item.clone(), now).await,
                };

                match written {
                    Ok(saved) => {
                        return UpsertResponse {
                            status: ResponseStatus::Success,
                            item: saved,
                            errors,
                        };
                    }
                    Err(e) => errors.push(WriteError::new(e.to_string())),
                }
            }
        }

        UpsertResponse {
            status: ResponseStatus::BadRequest,
            item,
            errors,
        }
    }

    /// Physically delete an image, returning the removed row.
    pub async fn delete(&self, id: &str) -> AppResult<image::Model> {
        self.images.delete(id).await
    }

    /// Logically delete an image, returning the flagged row.
    pub async fn delete_logical(&self, id: &str, now: DateTime<Utc>) -> AppResult<image::Model> {
        self.images.soft_delete(id, now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_image(id: &str) -> image::Model {
        image::Model {
            id: id.to_string(),
            owner_id: "tenant1".to_string(),
            url: "https://cdn.example.com/img1.png".to_string(),
            height: 480,
            width: 640,
            display_order: 0,
            is_deleted: false,
            is_published: true,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> ImageService {
        ImageService::new(ImageRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_upsert_insert_path() {
        let saved = create_test_image("img1");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::new(), vec![saved.clone()]])
            .into_connection();

        let service = service_with(db);
        let response = service.upsert(create_test_image("img1"), Utc::now()).await;

        assert!(response.is_success());
        assert_eq!(response.item.id, "img1");
    }

    #[tokio::test]
    async fn test_upsert_update_path() {
        let existing = create_test_image("img1");
        let mut updated = existing.clone();
        updated.url = "https://cdn.example.com/img1-v2.png".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing], vec![updated.clone()]])
            .into_connection();

        let service = service_with(db);
        let response = service.upsert(updated, Utc::now()).await;

        assert!(response.is_success());
        assert!(response.item.url.ends_with("v2.png"));
    }

    #[tokio::test]
    async fn test_upsert_invalid_url_is_rejected() {
        let mut invalid = create_test_image("img1");
        invalid.url = String::new();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service_with(db);
        let response = service.upsert(invalid, Utc::now()).await;

        assert_eq!(response.status, ResponseStatus::BadRequest);
        assert!(!response.errors.is_empty());
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
            .list("tenant1", &PageRequest::new(1, 10), LookupMode::Public)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}

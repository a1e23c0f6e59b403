//! Shared write orchestration.
//!
//! Every entity kind goes through the same write state machine: accumulate
//! referential-validation errors, branch insert-vs-update on the primary
//! key, run the uniqueness guard only when the perma name is new or has
//! changed, and fold any storage fault into the structured error list
//! instead of letting it propagate. Entity kinds plug in via [`UpsertStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_common::AppResult;
use serde::Serialize;

/// A structured write-path error.
///
/// The code is always 500 regardless of cause (referential failure,
/// uniqueness collision, storage fault); clients branch on the message and
/// the envelope status, and existing clients depend on the fixed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteError {
    pub code: i32,
    pub message: String,
}

impl WriteError {
    /// Create a write error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
        }
    }
}

/// Coarse outcome of a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    #[serde(rename = "Success")]
    Success,
    #[serde(rename = "Bad Request")]
    BadRequest,
}

/// Envelope returned by every upsert.
///
/// On success `item` is the persisted row; on rejection it echoes the
/// submitted item so the caller can re-render the form. The error list, not
/// just the status, carries the field-level detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResponse<T> {
    pub status: ResponseStatus,
    pub item: T,
    pub errors: Vec<WriteError>,
}

impl<T> UpsertResponse<T> {
    fn committed(item: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            item,
            errors: Vec::new(),
        }
    }

    fn rejected(item: T, errors: Vec<WriteError>) -> Self {
        Self {
            status: ResponseStatus::BadRequest,
            item,
            errors,
        }
    }

    /// Whether the write was committed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Storage hooks one entity kind plugs into [`run_upsert`].
#[async_trait]
pub trait UpsertStore: Send + Sync {
    type Item: Clone + Send + Sync;

    /// Primary key of an item. Empty means "not yet persisted".
    fn id(item: &Self::Item) -> &str;

    /// Perma name of an item, compared to decide whether the uniqueness
    /// guard runs on update.
    fn perma_name(item: &Self::Item) -> &str;

    /// Point lookup by the item's primary key.
    async fn find_existing(&self, item: &Self::Item) -> AppResult<Option<Self::Item>>;

    /// Whether the item's composite scope key is free of collisions.
    async fn scope_is_free(&self, item: &Self::Item) -> AppResult<bool>;

    async fn insert(&self, item: Self::Item, now: DateTime<Utc>) -> AppResult<Self::Item>;

    async fn update(&self, item: Self::Item, now: DateTime<Utc>) -> AppResult<Self::Item>;
}

const PERMA_NAME_TAKEN: &str = "Perma name is not unique.";

/// Run the write state machine for one item.
///
/// `errors` carries referential-validation failures the service accumulated
/// before calling in; a non-empty list rejects the write without touching
/// the store.
pub async fn run_upsert<S: UpsertStore>(
    store: &S,
    item: S::Item,
    mut errors: Vec<WriteError>,
    now: DateTime<Utc>,
) -> UpsertResponse<S::Item> {
    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "write rejected before store access");
        return UpsertResponse::rejected(item, errors);
    }

    let existing = if S::id(&item).is_empty() {
        None
    } else {
        match store.find_existing(&item).await {
            Ok(found) => found,
            Err(e) => {
                errors.push(WriteError::new(e.to_string()));
                return UpsertResponse::rejected(item, errors);
            }
        }
    };

    match existing {
        None => match store.scope_is_free(&item).await {
            Ok(true) => match store.insert(item.clone(), now).await {
                Ok(saved) => return UpsertResponse::committed(saved),
                Err(e) => errors.push(WriteError::new(e.to_string())),
            },
            Ok(false) => errors.push(WriteError::new(PERMA_NAME_TAKEN)),
            Err(e) => errors.push(WriteError::new(e.to_string())),
        },
        Some(current) => {
            // An unchanged perma name is trivially compatible with itself;
            // the guard runs only when it differs from the stored value.
            let mut guard_passed = true;

            if S::perma_name(&current) != S::perma_name(&item) {
                match store.scope_is_free(&item).await {
                    Ok(true) => {}
                    Ok(false) => {
                        guard_passed = false;
                        errors.push(WriteError::new(PERMA_NAME_TAKEN));
                    }
                    Err(e) => {
                        guard_passed = false;
                        errors.push(WriteError::new(e.to_string()));
                    }
                }
            }

            if guard_passed {
                match store.update(item.clone(), now).await {
                    Ok(saved) => return UpsertResponse::committed(saved),
                    Err(e) => errors.push(WriteError::new(e.to_string())),
                }
            }
        }
    }

    tracing::warn!(errors = errors.len(), "write rejected");
    UpsertResponse::rejected(item, errors)
}

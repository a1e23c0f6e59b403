//! Data access repositories.
//!
//! One repository per entity kind, each wrapping a shared
//! [`sea_orm::DatabaseConnection`]. Lookups are always tenant-scoped and
//! take a [`LookupMode`]; writes stamp timestamps and derived fields but
//! leave policy (referential validation, uniqueness branching) to the
//! service layer.

#![allow(missing_docs)]

pub mod article;
pub mod author;
pub mod category;
pub mod channel;
pub mod image;
pub mod sub_category;

pub use article::{ArticleListFilter, ArticleRepository};
pub use author::AuthorRepository;
pub use category::CategoryRepository;
pub use channel::ChannelRepository;
pub use image::ImageRepository;
pub use sub_category::SubCategoryRepository;

/// Visibility policy applied to reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Excludes soft-deleted rows; article reads additionally require the
    /// publish window to contain "now".
    Public,
    /// No deletion or visibility filtering.
    Admin,
}

impl LookupMode {
    /// Whether this mode hides soft-deleted rows.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

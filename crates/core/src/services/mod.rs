//! Business logic services.

#![allow(missing_docs)]

pub mod article;
pub mod author;
pub mod category;
pub mod channel;
pub mod image;
pub mod sub_category;
pub mod upsert;

pub use article::{ArticleQuery, ArticleService, ArticleView};
pub use author::{AuthorService, AuthorView};
pub use category::{CategoryService, CategoryView};
pub use channel::{ChannelService, ChannelView};
pub use image::ImageService;
pub use sub_category::{SubCategoryService, SubCategoryView};
pub use upsert::{ResponseStatus, UpsertResponse, UpsertStore, WriteError, run_upsert};

//! Database entities.
//!
//! Every content row is owned by exactly one tenant (`owner_id`) and carries
//! the common base fields: soft-delete flag, publish flag, created/modified
//! timestamps. Perma-name uniqueness is enforced by application logic before
//! writes, not by database constraints.

pub mod article;
pub mod author;
pub mod category;
pub mod channel;
pub mod image;
pub mod sub_category;

pub use article::Entity as Article;
pub use author::Entity as Author;
pub use category::Entity as Category;
pub use channel::Entity as Channel;
pub use image::Entity as Image;
pub use sub_category::Entity as SubCategory;

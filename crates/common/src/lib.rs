//! Common utilities and shared types for newsroom.
//!
//! This crate provides foundational components used across all newsroom
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: Page envelopes and slicing via [`Page`] and [`PageRequest`]
//!
//! # Example
//!
//! ```
//! use newsroom_common::{IdGenerator, Page, PageRequest};
//!
//! let id_gen = IdGenerator::new();
//! let id = id_gen.generate();
//! assert_eq!(id.len(), 26);
//!
//! let page = Page::assemble(vec![id], &PageRequest::new(1, 10), 1);
//! assert_eq!(page.total_pages, 1);
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{Page, PageRequest, paginate};

//! Core business logic for newsroom.
//!
//! Services compose the repositories in `newsroom-db` into the operations a
//! front end needs: hierarchical article resolution by perma-name chains,
//! paginated listings decorated with article counts, and the shared upsert
//! orchestration that enforces referential and perma-name uniqueness rules
//! before any write.

pub mod services;
pub mod visibility;

pub use services::*;
pub use visibility::is_visible;

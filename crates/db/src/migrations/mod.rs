//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20210427_000001_create_content_tables;
mod m20210503_000002_add_author_display_order;
mod m20210508_000003_add_article_markdown_text;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20210427_000001_create_content_tables::Migration),
            Box::new(m20210503_000002_add_author_display_order::Migration),
            Box::new(m20210508_000003_add_article_markdown_text::Migration),
        ]
    }
}

//! Migration to add a display order to authors.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Author::Table)
                    .add_column(
                        ColumnDef::new(Author::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Author::Table)
                    .drop_column(Author::DisplayOrder)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Author {
    Table,
    DisplayOrder,
}

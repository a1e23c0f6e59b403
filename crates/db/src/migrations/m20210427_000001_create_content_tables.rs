//! Create the content tables: channel, category, `sub_category`, author,
//! article and image.
//!
//! Perma-name uniqueness is deliberately NOT expressed as a unique index;
//! it is enforced by the application before every write. Deployments that
//! want a storage-level backstop can add the composite unique indexes on
//! top of this schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create channel table
        manager
            .create_table(
                Table::create()
                    .table(Channel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Channel::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Channel::OwnerId).string_len(64).not_null())
                    .col(ColumnDef::new(Channel::Name).string().not_null())
                    .col(
                        ColumnDef::new(Channel::PermaName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Channel::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Channel::Title).string())
                    .col(ColumnDef::new(Channel::Description).text())
                    .col(
                        ColumnDef::new(Channel::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channel::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Channel::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Channel::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup path: tenant + perma name
        manager
            .create_index(
                Index::create()
                    .name("idx_channel_owner_perma_name")
                    .table(Channel::Table)
                    .col(Channel::OwnerId)
                    .col(Channel::PermaName)
                    .to_owned(),
            )
            .await?;

        // Create category table
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::OwnerId).string_len(64).not_null())
                    .col(ColumnDef::new(Category::Name).string().not_null())
                    .col(
                        ColumnDef::new(Category::PermaName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Category::ChannelId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Category::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Category::Title).string())
                    .col(ColumnDef::new(Category::Description).text())
                    .col(
                        ColumnDef::new(Category::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Category::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Category::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Category::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_channel")
                            .from(Category::Table, Category::ChannelId)
                            .to(Channel::Table, Channel::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_owner_channel_perma_name")
                    .table(Category::Table)
                    .col(Category::OwnerId)
                    .col(Category::ChannelId)
                    .col(Category::PermaName)
                    .to_owned(),
            )
            .await?;

        // Create sub_category table
        manager
            .create_table(
                Table::create()
                    .table(SubCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubCategory::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubCategory::OwnerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubCategory::Name).string().not_null())
                    .col(
                        ColumnDef::new(SubCategory::PermaName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubCategory::ChannelId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubCategory::CategoryId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubCategory::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SubCategory::Title).string())
                    .col(ColumnDef::new(SubCategory::Description).text())
                    .col(
                        ColumnDef::new(SubCategory::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubCategory::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubCategory::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SubCategory::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_category_channel")
                            .from(SubCategory::Table, SubCategory::ChannelId)
                            .to(Channel::Table, Channel::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_category_category")
                            .from(SubCategory::Table, SubCategory::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sub_category_owner_channel_category_perma_name")
                    .table(SubCategory::Table)
                    .col(SubCategory::OwnerId)
                    .col(SubCategory::ChannelId)
                    .col(SubCategory::CategoryId)
                    .col(SubCategory::PermaName)
                    .to_owned(),
            )
            .await?;

        // Create author table
        manager
            .create_table(
                Table::create()
                    .table(Author::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Author::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Author::OwnerId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Author::PermaName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Author::Name).string().not_null())
                    .col(ColumnDef::new(Author::AlterName).string())
                    .col(ColumnDef::new(Author::Description).text())
                    .col(ColumnDef::new(Author::IconImageUrl).string())
                    .col(
                        ColumnDef::new(Author::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Author::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Author::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Author::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_author_owner_perma_name")
                    .table(Author::Table)
                    .col(Author::OwnerId)
                    .col(Author::PermaName)
                    .to_owned(),
            )
            .await?;

        // Create article table
        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Article::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Article::OwnerId).string_len(64).not_null())
                    .col(ColumnDef::new(Article::Title).string().not_null())
                    .col(ColumnDef::new(Article::Description).text())
                    .col(ColumnDef::new(Article::Text).text())
                    .col(ColumnDef::new(Article::Url).string())
                    .col(
                        ColumnDef::new(Article::Publish)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::PublishUnixtime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Article::Expire)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::ExpireUnixtime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Article::ImageId).string_len(64))
                    .col(ColumnDef::new(Article::ImageUrl).string())
                    .col(ColumnDef::new(Article::Tags).string())
                    .col(ColumnDef::new(Article::ChannelId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Article::CategoryId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::SubCategoryId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Article::AuthorId).string_len(64).not_null())
                    .col(ColumnDef::new(Article::Culture).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Article::PermaName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Article::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Article::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Article::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_channel")
                            .from(Article::Table, Article::ChannelId)
                            .to(Channel::Table, Channel::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_category")
                            .from(Article::Table, Article::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_sub_category")
                            .from(Article::Table, Article::SubCategoryId)
                            .to(SubCategory::Table, SubCategory::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_author")
                            .from(Article::Table, Article::AuthorId)
                            .to(Author::Table, Author::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Resolution path: tenant + culture + perma name
        manager
            .create_index(
                Index::create()
                    .name("idx_article_owner_culture_perma_name")
                    .table(Article::Table)
                    .col(Article::OwnerId)
                    .col(Article::Culture)
                    .col(Article::PermaName)
                    .to_owned(),
            )
            .await?;

        // Visibility window scans
        manager
            .create_index(
                Index::create()
                    .name("idx_article_publish_unixtime")
                    .table(Article::Table)
                    .col(Article::PublishUnixtime)
                    .to_owned(),
            )
            .await?;

        // Parent narrowing
        manager
            .create_index(
                Index::create()
                    .name("idx_article_channel_id")
                    .table(Article::Table)
                    .col(Article::ChannelId)
                    .to_owned(),
            )
            .await?;

        // Create image table
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Image::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Image::OwnerId).string_len(64).not_null())
                    .col(ColumnDef::new(Image::Url).string().not_null())
                    .col(
                        ColumnDef::new(Image::Height)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Image::Width).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Image::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Image::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Image::Modified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_owner_id")
                    .table(Image::Table)
                    .col(Image::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Article::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Author::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubCategory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Channel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Channel {
    Table,
    Id,
    OwnerId,
    Name,
    PermaName,
    DisplayOrder,
    Title,
    Description,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    OwnerId,
    Name,
    PermaName,
    ChannelId,
    DisplayOrder,
    Title,
    Description,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

#[derive(Iden)]
enum SubCategory {
    Table,
    Id,
    OwnerId,
    Name,
    PermaName,
    ChannelId,
    CategoryId,
    DisplayOrder,
    Title,
    Description,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

#[derive(Iden)]
enum Author {
    Table,
    Id,
    OwnerId,
    PermaName,
    Name,
    AlterName,
    Description,
    IconImageUrl,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

#[derive(Iden)]
enum Article {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    Text,
    Url,
    Publish,
    PublishUnixtime,
    Expire,
    ExpireUnixtime,
    ImageId,
    ImageUrl,
    Tags,
    ChannelId,
    CategoryId,
    SubCategoryId,
    AuthorId,
    Culture,
    PermaName,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
    OwnerId,
    Url,
    Height,
    Width,
    DisplayOrder,
    IsDeleted,
    IsPublished,
    Created,
    Modified,
}

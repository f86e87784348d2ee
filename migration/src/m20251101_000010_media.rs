use sea_orm_migration::{prelude::*, schema::*};

static IDX_MEDIA_OWNER: &str = "idx-media-owner_type-owner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(pk_auto(Media::Id))
                    .col(string_len(Media::OwnerType, 32))
                    .col(integer(Media::OwnerId))
                    .col(string_uniq(Media::StorageKey))
                    .col(string(Media::FileName))
                    .col(string_len(Media::MimeType, 64))
                    .col(big_integer(Media::SizeBytes))
                    .col(integer_null(Media::Width))
                    .col(integer_null(Media::Height))
                    .col(timestamp(Media::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MEDIA_OWNER)
                    .table(Media::Table)
                    .col(Media::OwnerType)
                    .col(Media::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MEDIA_OWNER)
                    .table(Media::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
    OwnerType,
    OwnerId,
    StorageKey,
    FileName,
    MimeType,
    SizeBytes,
    Width,
    Height,
    CreatedAt,
}

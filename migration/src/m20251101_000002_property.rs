use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_app_user::AppUser;

static IDX_PROPERTY_CITY: &str = "idx-property-city";
static FK_PROPERTY_CREATED_BY: &str = "fk-property-created_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(pk_auto(Property::Id))
                    .col(string(Property::Name))
                    .col(string(Property::Address))
                    .col(string(Property::City))
                    .col(string(Property::Country))
                    .col(text_null(Property::Description))
                    .col(string_len(Property::PropertyType, 16))
                    .col(integer(Property::CreatedBy))
                    .col(timestamp_null(Property::DeletedAt))
                    .col(timestamp(Property::CreatedAt))
                    .col(timestamp(Property::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROPERTY_CITY)
                    .table(Property::Table)
                    .col(Property::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PROPERTY_CREATED_BY)
                    .from_tbl(Property::Table)
                    .from_col(Property::CreatedBy)
                    .to_tbl(AppUser::Table)
                    .to_col(AppUser::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PROPERTY_CREATED_BY)
                    .table(Property::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PROPERTY_CITY)
                    .table(Property::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Property::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Property {
    Table,
    Id,
    Name,
    Address,
    City,
    Country,
    Description,
    PropertyType,
    CreatedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

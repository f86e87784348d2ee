use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000002_property::Property;

static IDX_UNIT_PROPERTY_ID: &str = "idx-unit-property_id";
static FK_UNIT_PROPERTY_ID: &str = "fk-unit-property_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Unit::Table)
                    .if_not_exists()
                    .col(pk_auto(Unit::Id))
                    .col(integer(Unit::PropertyId))
                    .col(string(Unit::Name))
                    .col(string_len(Unit::UnitType, 16))
                    .col(integer(Unit::Bedrooms))
                    .col(integer(Unit::Bathrooms))
                    .col(integer(Unit::MaxGuests))
                    .col(double(Unit::NightlyRate))
                    .col(string_len(Unit::Status, 16))
                    .col(timestamp_null(Unit::DeletedAt))
                    .col(timestamp(Unit::CreatedAt))
                    .col(timestamp(Unit::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_UNIT_PROPERTY_ID)
                    .table(Unit::Table)
                    .col(Unit::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_UNIT_PROPERTY_ID)
                    .from_tbl(Unit::Table)
                    .from_col(Unit::PropertyId)
                    .to_tbl(Property::Table)
                    .to_col(Property::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_UNIT_PROPERTY_ID)
                    .table(Unit::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_UNIT_PROPERTY_ID)
                    .table(Unit::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Unit::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Unit {
    Table,
    Id,
    PropertyId,
    Name,
    UnitType,
    Bedrooms,
    Bathrooms,
    MaxGuests,
    NightlyRate,
    Status,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_unit::Unit, m20251101_000006_inventory_item::InventoryItem};

static IDX_ASSIGNMENT_ITEM_UNIT: &str = "idx-inventory_assignment-item_id-unit_id";
static FK_ASSIGNMENT_ITEM_ID: &str = "fk-inventory_assignment-item_id";
static FK_ASSIGNMENT_UNIT_ID: &str = "fk-inventory_assignment-unit_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryAssignment::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryAssignment::Id))
                    .col(integer(InventoryAssignment::ItemId))
                    .col(integer(InventoryAssignment::UnitId))
                    .col(integer(InventoryAssignment::Quantity))
                    .col(string_len(InventoryAssignment::Condition, 16))
                    .col(timestamp(InventoryAssignment::CreatedAt))
                    .col(timestamp(InventoryAssignment::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ASSIGNMENT_ITEM_UNIT)
                    .table(InventoryAssignment::Table)
                    .col(InventoryAssignment::ItemId)
                    .col(InventoryAssignment::UnitId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ASSIGNMENT_ITEM_ID)
                    .from_tbl(InventoryAssignment::Table)
                    .from_col(InventoryAssignment::ItemId)
                    .to_tbl(InventoryItem::Table)
                    .to_col(InventoryItem::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ASSIGNMENT_UNIT_ID)
                    .from_tbl(InventoryAssignment::Table)
                    .from_col(InventoryAssignment::UnitId)
                    .to_tbl(Unit::Table)
                    .to_col(Unit::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_ASSIGNMENT_UNIT_ID, FK_ASSIGNMENT_ITEM_ID] {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(fk)
                        .table(InventoryAssignment::Table)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ASSIGNMENT_ITEM_UNIT)
                    .table(InventoryAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(InventoryAssignment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum InventoryAssignment {
    Table,
    Id,
    ItemId,
    UnitId,
    Quantity,
    Condition,
    CreatedAt,
    UpdatedAt,
}

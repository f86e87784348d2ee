use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251101_000007_inventory_assignment::InventoryAssignment,
    m20251101_000008_checkout_report::CheckoutReport,
};

static IDX_ITEM_CHECK_REPORT_ID: &str = "idx-checkout_item_check-report_id";
static FK_ITEM_CHECK_REPORT_ID: &str = "fk-checkout_item_check-report_id";
static FK_ITEM_CHECK_ASSIGNMENT_ID: &str = "fk-checkout_item_check-assignment_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckoutItemCheck::Table)
                    .if_not_exists()
                    .col(pk_auto(CheckoutItemCheck::Id))
                    .col(integer(CheckoutItemCheck::ReportId))
                    .col(integer(CheckoutItemCheck::AssignmentId))
                    .col(integer(CheckoutItemCheck::ExpectedQuantity))
                    .col(integer(CheckoutItemCheck::FoundQuantity))
                    .col(string_len(CheckoutItemCheck::Condition, 16))
                    .col(text_null(CheckoutItemCheck::Notes))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ITEM_CHECK_REPORT_ID)
                    .table(CheckoutItemCheck::Table)
                    .col(CheckoutItemCheck::ReportId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ITEM_CHECK_REPORT_ID)
                    .from_tbl(CheckoutItemCheck::Table)
                    .from_col(CheckoutItemCheck::ReportId)
                    .to_tbl(CheckoutReport::Table)
                    .to_col(CheckoutReport::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ITEM_CHECK_ASSIGNMENT_ID)
                    .from_tbl(CheckoutItemCheck::Table)
                    .from_col(CheckoutItemCheck::AssignmentId)
                    .to_tbl(InventoryAssignment::Table)
                    .to_col(InventoryAssignment::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_ITEM_CHECK_ASSIGNMENT_ID, FK_ITEM_CHECK_REPORT_ID] {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(fk)
                        .table(CheckoutItemCheck::Table)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ITEM_CHECK_REPORT_ID)
                    .table(CheckoutItemCheck::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CheckoutItemCheck::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CheckoutItemCheck {
    Table,
    Id,
    ReportId,
    AssignmentId,
    ExpectedQuantity,
    FoundQuantity,
    Condition,
    Notes,
}

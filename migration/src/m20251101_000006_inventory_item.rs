use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryItem::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryItem::Id))
                    .col(string(InventoryItem::Name))
                    .col(string(InventoryItem::Category))
                    .col(text_null(InventoryItem::Description))
                    .col(integer(InventoryItem::Quantity))
                    .col(double(InventoryItem::UnitCost))
                    .col(timestamp_null(InventoryItem::DeletedAt))
                    .col(timestamp(InventoryItem::CreatedAt))
                    .col(timestamp(InventoryItem::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryItem::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum InventoryItem {
    Table,
    Id,
    Name,
    Category,
    Description,
    Quantity,
    UnitCost,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

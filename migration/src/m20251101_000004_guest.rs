use sea_orm_migration::{prelude::*, schema::*};

static IDX_GUEST_EMAIL: &str = "idx-guest-email";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guest::Table)
                    .if_not_exists()
                    .col(pk_auto(Guest::Id))
                    .col(string(Guest::FirstName))
                    .col(string(Guest::LastName))
                    .col(string(Guest::Email))
                    .col(string_null(Guest::Phone))
                    .col(string_null(Guest::Nationality))
                    .col(string_null(Guest::DocumentNumber))
                    .col(text_null(Guest::Notes))
                    .col(timestamp_null(Guest::DeletedAt))
                    .col(timestamp(Guest::CreatedAt))
                    .col(timestamp(Guest::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Uniqueness only applies to non-deleted guests and is enforced by the guest service
        manager
            .create_index(
                Index::create()
                    .name(IDX_GUEST_EMAIL)
                    .table(Guest::Table)
                    .col(Guest::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GUEST_EMAIL)
                    .table(Guest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Guest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Guest {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Nationality,
    DocumentNumber,
    Notes,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

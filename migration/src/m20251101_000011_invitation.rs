use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_app_user::AppUser;

static IDX_INVITATION_EMAIL: &str = "idx-invitation-email";
static FK_INVITATION_INVITED_BY: &str = "fk-invitation-invited_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitation::Table)
                    .if_not_exists()
                    .col(pk_auto(Invitation::Id))
                    .col(string(Invitation::Email))
                    .col(string_len(Invitation::Role, 16))
                    .col(string_uniq(Invitation::Token))
                    .col(integer(Invitation::InvitedBy))
                    .col(string_len(Invitation::Status, 16))
                    .col(timestamp(Invitation::ExpiresAt))
                    .col(timestamp_null(Invitation::AcceptedAt))
                    .col(timestamp(Invitation::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVITATION_EMAIL)
                    .table(Invitation::Table)
                    .col(Invitation::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_INVITATION_INVITED_BY)
                    .from_tbl(Invitation::Table)
                    .from_col(Invitation::InvitedBy)
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
                    .name(FK_INVITATION_INVITED_BY)
                    .table(Invitation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_INVITATION_EMAIL)
                    .table(Invitation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Invitation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Invitation {
    Table,
    Id,
    Email,
    Role,
    Token,
    InvitedBy,
    Status,
    ExpiresAt,
    AcceptedAt,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_unit::Unit, m20251101_000004_guest::Guest};

static IDX_BOOKING_UNIT_ID: &str = "idx-booking-unit_id";
static IDX_BOOKING_GUEST_ID: &str = "idx-booking-guest_id";
static FK_BOOKING_UNIT_ID: &str = "fk-booking-unit_id";
static FK_BOOKING_GUEST_ID: &str = "fk-booking-guest_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer(Booking::UnitId))
                    .col(integer(Booking::GuestId))
                    .col(date(Booking::CheckIn))
                    .col(date(Booking::CheckOut))
                    .col(integer(Booking::GuestsCount))
                    .col(double(Booking::TotalAmount))
                    .col(string_len(Booking::Status, 16))
                    .col(text_null(Booking::Notes))
                    .col(integer(Booking::CreatedBy))
                    .col(timestamp(Booking::CreatedAt))
                    .col(timestamp(Booking::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BOOKING_UNIT_ID)
                    .table(Booking::Table)
                    .col(Booking::UnitId)
                    .col(Booking::CheckIn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_BOOKING_GUEST_ID)
                    .table(Booking::Table)
                    .col(Booking::GuestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BOOKING_UNIT_ID)
                    .from_tbl(Booking::Table)
                    .from_col(Booking::UnitId)
                    .to_tbl(Unit::Table)
                    .to_col(Unit::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BOOKING_GUEST_ID)
                    .from_tbl(Booking::Table)
                    .from_col(Booking::GuestId)
                    .to_tbl(Guest::Table)
                    .to_col(Guest::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_BOOKING_GUEST_ID, FK_BOOKING_UNIT_ID] {
            manager
                .drop_foreign_key(ForeignKey::drop().name(fk).table(Booking::Table).to_owned())
                .await?;
        }

        for idx in [IDX_BOOKING_GUEST_ID, IDX_BOOKING_UNIT_ID] {
            manager
                .drop_index(Index::drop().name(idx).table(Booking::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    UnitId,
    GuestId,
    CheckIn,
    CheckOut,
    GuestsCount,
    TotalAmount,
    Status,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

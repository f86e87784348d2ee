use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000001_app_user::AppUser, m20251101_000005_booking::Booking};

static FK_CHECKOUT_REPORT_BOOKING_ID: &str = "fk-checkout_report-booking_id";
static FK_CHECKOUT_REPORT_INSPECTOR_ID: &str = "fk-checkout_report-inspector_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckoutReport::Table)
                    .if_not_exists()
                    .col(pk_auto(CheckoutReport::Id))
                    .col(integer_uniq(CheckoutReport::BookingId))
                    .col(integer(CheckoutReport::InspectorId))
                    .col(integer(CheckoutReport::CleanlinessRating))
                    .col(boolean(CheckoutReport::DamagesFound))
                    .col(text_null(CheckoutReport::DamageDescription))
                    .col(double(CheckoutReport::DamageCharge))
                    .col(text_null(CheckoutReport::Notes))
                    .col(timestamp(CheckoutReport::CompletedAt))
                    .col(timestamp(CheckoutReport::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CHECKOUT_REPORT_BOOKING_ID)
                    .from_tbl(CheckoutReport::Table)
                    .from_col(CheckoutReport::BookingId)
                    .to_tbl(Booking::Table)
                    .to_col(Booking::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CHECKOUT_REPORT_INSPECTOR_ID)
                    .from_tbl(CheckoutReport::Table)
                    .from_col(CheckoutReport::InspectorId)
                    .to_tbl(AppUser::Table)
                    .to_col(AppUser::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_CHECKOUT_REPORT_INSPECTOR_ID, FK_CHECKOUT_REPORT_BOOKING_ID] {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(fk)
                        .table(CheckoutReport::Table)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .drop_table(Table::drop().table(CheckoutReport::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CheckoutReport {
    Table,
    Id,
    BookingId,
    InspectorId,
    CleanlinessRating,
    DamagesFound,
    DamageDescription,
    DamageCharge,
    Notes,
    CompletedAt,
    CreatedAt,
}

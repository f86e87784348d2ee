pub use sea_orm_migration::prelude::*;

mod m20251101_000001_app_user;
mod m20251101_000002_property;
mod m20251101_000003_unit;
mod m20251101_000004_guest;
mod m20251101_000005_booking;
mod m20251101_000006_inventory_item;
mod m20251101_000007_inventory_assignment;
mod m20251101_000008_checkout_report;
mod m20251101_000009_checkout_item_check;
mod m20251101_000010_media;
mod m20251101_000011_invitation;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_app_user::Migration),
            Box::new(m20251101_000002_property::Migration),
            Box::new(m20251101_000003_unit::Migration),
            Box::new(m20251101_000004_guest::Migration),
            Box::new(m20251101_000005_booking::Migration),
            Box::new(m20251101_000006_inventory_item::Migration),
            Box::new(m20251101_000007_inventory_assignment::Migration),
            Box::new(m20251101_000008_checkout_report::Migration),
            Box::new(m20251101_000009_checkout_item_check::Migration),
            Box::new(m20251101_000010_media::Migration),
            Box::new(m20251101_000011_invitation::Migration),
        ]
    }
}

//! SeaORM entities for the Roost database schema.

pub mod prelude;

pub mod app_user;
pub mod booking;
pub mod checkout_item_check;
pub mod checkout_report;
pub mod guest;
pub mod inventory_assignment;
pub mod inventory_item;
pub mod invitation;
pub mod media;
pub mod property;
pub mod unit;

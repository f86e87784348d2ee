//! Data access layer repositories.
//!
//! Repositories wrap sea-orm queries for a single table each and are generic over
//! [`sea_orm::ConnectionTrait`] so services can run them against a connection or inside a
//! transaction. Soft deleted rows are hidden by every `get` and `list`.

pub mod booking;
pub mod checkout;
pub mod guest;
pub mod inventory;
pub mod media;
pub mod property;
pub mod unit;
pub mod user;

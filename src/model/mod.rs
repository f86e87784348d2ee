//! API data transfer objects shared by controllers, services and tests.
//!
//! Every type here is serialized over HTTP and documented in the OpenAPI schema.

#[macro_use]
pub mod macros;

pub mod api;
pub mod booking;
pub mod checkout;
pub mod guest;
pub mod inventory;
pub mod invitation;
pub mod media;
pub mod property;
pub mod unit;
pub mod user;

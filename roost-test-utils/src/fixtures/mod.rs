//! Test fixture modules for inserting rows during test execution.
//!
//! - `auth` - access tokens signed like the authentication provider's
//! - `user` - application users
//! - `rental` - properties, units, guests and bookings
//! - `inventory` - inventory items and unit assignments
//! - `media` - media rows without stored objects

pub mod auth;
pub mod inventory;
pub mod media;
pub mod rental;
pub mod user;

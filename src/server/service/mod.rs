//! Service layer for business logic.
//!
//! Services validate requests, enforce the business rules of each resource and coordinate
//! repositories, running multi-step changes inside a single transaction.

pub mod auth;
pub mod booking;
pub mod checkout;
pub mod guest;
pub mod inventory;
pub mod invitation;
pub mod media;
pub mod property;
pub mod retry;
pub mod unit;
pub mod user;

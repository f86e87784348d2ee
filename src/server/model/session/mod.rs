//! Session data models and utilities.
//!
//! Type-safe wrappers for the values Roost keeps in the tower-sessions session: the logged in
//! user ID and the draft of an in-progress checkout.

pub mod checkout;
pub mod user;

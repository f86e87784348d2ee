//! HTTP controller endpoints for the Roost web API.
//!
//! Axum handlers for every resource. Handlers check the session user's role, hand the request
//! to a service and turn the result into a JSON response. Each handler is annotated with utoipa
//! for the OpenAPI documentation.

pub mod auth;
pub mod booking;
pub mod checkout;
pub mod guest;
pub mod inventory;
pub mod invitation;
pub mod media;
pub mod property;
pub mod unit;
pub mod user;
pub mod util;

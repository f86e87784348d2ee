//! Helpers shared by controllers.
//!
//! Session user lookup with role checks for protected endpoints, and multipart parsing for
//! upload endpoints.

pub mod get_user;
pub mod multipart;

//! Server application models and type definitions.
//!
//! Application state shared by handlers, database model aliases with their DTO conversions,
//! and typed wrappers around session data.

pub mod app;
pub mod db;
pub mod session;

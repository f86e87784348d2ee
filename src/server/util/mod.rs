//! Helpers shared across the server.
//!
//! - `pagination` - list query normalization and paged fetching
//! - `token` - random tokens for invitations and storage keys
//! - `validate` - field checks used by services

pub mod pagination;
pub mod token;
pub mod validate;

//! Server application core modules.
//!
//! This module contains the HTTP routing, controllers, services, repositories and scheduled
//! jobs of Roost. Controllers stay thin, business rules live in services and every database
//! access goes through a repository generic over the sea-orm connection type.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;

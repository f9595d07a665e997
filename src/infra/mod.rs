//! The infrastructure module.
//!
//! Contains common modules that help with non-functional requirements.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod openapi;
pub mod state;

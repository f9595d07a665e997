//! The item feature.
//!
//! Validation of incoming payloads, the item service, and the
//! persistence layer behind it.

pub mod item_api;
pub mod item_repository;
pub mod item_service;
pub mod item_validation;

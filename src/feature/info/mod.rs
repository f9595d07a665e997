//! Information about the service itself.

pub mod info_api;

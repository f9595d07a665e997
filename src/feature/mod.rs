//! The feature modules.

pub mod info;
pub mod item;

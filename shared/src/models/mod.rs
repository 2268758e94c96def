//! Data models
//!
//! Catalog entities shared between the order model and the persistence layer.

pub mod menu;

// Re-exports
pub use menu::*;

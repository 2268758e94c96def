//! Core module - configuration
//!
//! - [`Config`] - work directory and logging settings

pub mod config;

pub use config::Config;

//! Order desk - table orders for a small restaurant
//!
//! # Layout
//!
//! - `core`: configuration
//! - `catalog`: read-only menu catalog
//! - `orders`: order book, persistence and per-table operations
//! - `utils`: logging
//!
//! The data model lives in the `shared` crate.

pub mod catalog;
pub mod core;
pub mod orders;
pub mod utils;

pub use catalog::MenuCatalog;
pub use crate::core::Config;
pub use orders::{
    EditSession, JsonStore, ManagerError, ManagerResult, OrderDesk, TableListing, TableOrders,
};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read configuration and start logging
pub fn setup_environment() -> Config {
    let dotenv_path = dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(config.log_level.as_str()), config.log_dir.as_deref());

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    tracing::info!(work_dir = %config.work_dir.display(), "Order desk configured");
    config
}

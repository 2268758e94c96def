//! Shared types for the table order desk
//!
//! The order/menu data model, its status/time rules and the error codes
//! reported to the presentation layer. No I/O happens here; persistence and
//! table-scoped mediation live in `order-desk`.

pub mod error;
pub mod models;
pub mod order;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{MenuCategory, MenuItem};
pub use order::{Order, OrderLine, OrderSnapshot, OrderStatus, OrderType};

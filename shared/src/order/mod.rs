//! Order model
//!
//! This module provides the types for a table's orders:
//! - Lines: one catalog item with quantity and note
//! - Orders: the aggregate with its derived total and status
//! - Schedule: the status/time classifier and schedule validation
//! - Snapshots: rollback points for cancelled edit sessions

pub mod error;
pub mod money;
pub mod schedule;
pub mod snapshot;
pub mod types;

// Re-exports
pub use error::{OrderError, OrderResult};
pub use schedule::{OrderType, parse_time_of_day, validate_schedule};
pub use snapshot::{Decrement, LineRepair, Order, OrderSnapshot, OrderStatus};
pub use types::{OrderLine, parse_quantity, validate_quantity};

//! Unified error system for the order desk
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Code, message and details handed to the presentation layer
//!
//! Layer-specific errors (`OrderError` here, storage and manager errors in
//! the application crate) convert into [`AppError`].
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", 42);
//! assert_eq!(err.code.code(), 4001);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};

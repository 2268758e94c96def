//! Error type surfaced to the presentation layer

use super::codes::ErrorCode;
use crate::order::OrderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// What the UI receives for any failed operation:
/// - a stable [`ErrorCode`] to switch on
/// - a human-readable message
/// - optional structured details (order id, item name, ...)
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Bad operator input; the operator can correct it and retry
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ValidationFailed
                | ErrorCode::ValueOutOfRange
                | ErrorCode::InvalidQuantity
                | ErrorCode::MalformedTime
                | ErrorCode::ScheduleInPast
                | ErrorCode::ScheduleTooFar
                | ErrorCode::StatusTransitionNotAllowed
        )
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::InvalidQuantity(input) => {
                Self::with_message(ErrorCode::InvalidQuantity, message).with_detail("input", input)
            }
            OrderError::AmountOverflow(item) => {
                Self::with_message(ErrorCode::ValueOutOfRange, message).with_detail("item", item)
            }
            OrderError::MalformedTime(input) => {
                Self::with_message(ErrorCode::MalformedTime, message).with_detail("input", input)
            }
            OrderError::ScheduleInPast(at) => Self::with_message(ErrorCode::ScheduleInPast, message)
                .with_detail("scheduled", at.to_string()),
            OrderError::ScheduleTooFar(at) => Self::with_message(ErrorCode::ScheduleTooFar, message)
                .with_detail("scheduled", at.to_string()),
            OrderError::TransitionNotAllowed { order_type, target } => {
                Self::with_message(ErrorCode::StatusTransitionNotAllowed, message)
                    .with_detail("order_type", format!("{order_type:?}"))
                    .with_detail("target", format!("{target:?}"))
            }
            OrderError::LineNotFound(name) => {
                Self::with_message(ErrorCode::OrderItemNotFound, message).with_detail("item", name)
            }
            OrderError::SnapshotMismatch { expected, found } => {
                Self::with_message(ErrorCode::SnapshotMismatch, message)
                    .with_detail("expected", expected)
                    .with_detail("found", found)
            }
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderStatus, OrderType};

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::not_found("Table 9");
        assert_eq!(err.message, "Table 9 not found");
        let details = err.details.unwrap();
        assert_eq!(details.get("resource"), Some(&Value::from("Table 9")));
    }

    #[test]
    fn test_from_order_error() {
        let err: AppError = OrderError::TransitionNotAllowed {
            order_type: OrderType::Past,
            target: OrderStatus::Preparing,
        }
        .into();
        assert_eq!(err.code, ErrorCode::StatusTransitionNotAllowed);
        assert!(err.is_validation());
        let details = err.details.unwrap();
        assert_eq!(details.get("target"), Some(&Value::from("Preparing")));

        let err: AppError = OrderError::LineNotFound("Борщ".into()).into();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
        assert!(!err.is_validation());
    }

    #[test]
    fn test_amount_overflow_is_validation() {
        let err: AppError = OrderError::AmountOverflow("Ікра".into()).into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(err.is_validation());
    }

    #[test]
    fn test_serialize_skips_empty_details() {
        let json = serde_json::to_value(AppError::new(ErrorCode::StorageIo)).unwrap();
        assert_eq!(json["code"], 9003);
        assert!(json.get("details").is_none());
    }
}

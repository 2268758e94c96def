use super::schedule::OrderType;
use super::snapshot::OrderStatus;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Order model errors
///
/// Every variant leaves the order untouched: the caller reports the message
/// and lets the operator try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Quantity must be a whole number greater than zero, got {0:?}")]
    InvalidQuantity(String),

    #[error("Amount too large: {0}")]
    AmountOverflow(String),

    #[error("Malformed time of day {0:?}, expected HH:mm")]
    MalformedTime(String),

    #[error("Scheduled time {0} is in the past")]
    ScheduleInPast(NaiveDateTime),

    #[error("Scheduled time {0} is more than a year ahead")]
    ScheduleTooFar(NaiveDateTime),

    #[error("Status {target:?} is not allowed for a {order_type:?} order")]
    TransitionNotAllowed {
        order_type: OrderType,
        target: OrderStatus,
    },

    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Snapshot belongs to order {found}, not {expected}")]
    SnapshotMismatch { expected: u64, found: u64 },
}

impl OrderError {
    /// Bad operator input, recoverable by re-entering the value
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::LineNotFound(_) | Self::SnapshotMismatch { .. }
        )
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

//! Unified error codes for the order desk
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 9xxx: Storage and system errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values so the presentation layer can switch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Amount or quantity too large to represent
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order line not found
    OrderItemNotFound = 4006,
    /// Quantity must be a positive integer
    InvalidQuantity = 4010,
    /// Time of day could not be parsed
    MalformedTime = 4011,
    /// Scheduled time is in the past
    ScheduleInPast = 4012,
    /// Scheduled time is too far ahead
    ScheduleTooFar = 4013,
    /// Status change not allowed for the order's current type
    StatusTransitionNotAllowed = 4014,
    /// Rollback snapshot does not belong to the order
    SnapshotMismatch = 4015,

    // ==================== 6xxx: Menu ====================
    /// Menu document could not be read
    MenuUnavailable = 6002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Stored document is corrupt
    StorageCorrupted = 9002,
    /// Reading or writing a document failed
    StorageIo = 9003,
}

impl ErrorCode {
    /// Numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::ValueOutOfRange => "Amount is too large",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::InvalidQuantity => "Quantity must be a whole number greater than zero",
            ErrorCode::MalformedTime => "Time must be entered as HH:mm",
            ErrorCode::ScheduleInPast => "Scheduled time is in the past",
            ErrorCode::ScheduleTooFar => "Orders cannot be scheduled more than a year ahead",
            ErrorCode::StatusTransitionNotAllowed => "Status change not allowed at this time",
            ErrorCode::SnapshotMismatch => "Snapshot belongs to a different order",

            ErrorCode::MenuUnavailable => "Menu could not be loaded",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageCorrupted => "Saved data is corrupt",
            ErrorCode::StorageIo => "Saved data could not be read or written",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 is not a known error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4010 => Ok(ErrorCode::InvalidQuantity),
            4011 => Ok(ErrorCode::MalformedTime),
            4012 => Ok(ErrorCode::ScheduleInPast),
            4013 => Ok(ErrorCode::ScheduleTooFar),
            4014 => Ok(ErrorCode::StatusTransitionNotAllowed),
            4015 => Ok(ErrorCode::SnapshotMismatch),

            // Menu
            6002 => Ok(ErrorCode::MenuUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageCorrupted),
            9003 => Ok(ErrorCode::StorageIo),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

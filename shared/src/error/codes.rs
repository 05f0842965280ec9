//! Unified error codes for the canteen platform
//!
//! This module defines all error codes used across the engine server and
//! its clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Slot errors
//! - 2xxx: Booking / queue errors
//! - 3xxx: Alert errors
//! - 4xxx: Analytics errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Slot ====================
    /// Slot instance not found
    SlotNotFound = 1001,
    /// Slot instance is not open for booking
    SlotInactive = 1002,
    /// Slot capacity has been reached
    CapacityExceeded = 1003,
    /// Slot instance already registered for this template/date
    SlotAlreadyExists = 1004,

    // ==================== 2xxx: Booking / Queue ====================
    /// Booking not found
    BookingNotFound = 2001,
    /// Booking status transition is not allowed
    InvalidTransition = 2002,
    /// No pending bookings in the queue
    EmptyQueue = 2003,

    // ==================== 3xxx: Alert ====================
    /// Alert not found
    AlertNotFound = 3001,
    /// Alert has already been resolved. Reserved for clients: the
    /// engine treats re-resolution as an idempotent no-op and never
    /// returns this code itself.
    AlertAlreadyResolved = 3002,

    // ==================== 4xxx: Analytics ====================
    /// Requested date range is invalid (start after end)
    RangeInvalid = 4001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage layer error
    StorageError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Slot
            ErrorCode::SlotNotFound => "Slot instance not found",
            ErrorCode::SlotInactive => "Slot is not open for booking",
            ErrorCode::CapacityExceeded => "Slot capacity has been reached",
            ErrorCode::SlotAlreadyExists => "Slot instance already exists for this date",

            // Booking / Queue
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::InvalidTransition => "Booking status transition is not allowed",
            ErrorCode::EmptyQueue => "No pending bookings in the queue",

            // Alert
            ErrorCode::AlertNotFound => "Alert not found",
            ErrorCode::AlertAlreadyResolved => "Alert has already been resolved",

            // Analytics
            ErrorCode::RangeInvalid => "Date range is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage layer error",
        }
    }

    /// Get the HTTP status code for this error code
    pub const fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            ErrorCode::ValidationFailed | ErrorCode::InvalidRequest | ErrorCode::RangeInvalid => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::NotFound
            | ErrorCode::SlotNotFound
            | ErrorCode::BookingNotFound
            | ErrorCode::AlertNotFound
            | ErrorCode::EmptyQueue => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists
            | ErrorCode::SlotAlreadyExists
            | ErrorCode::SlotInactive
            | ErrorCode::CapacityExceeded
            | ErrorCode::InvalidTransition
            | ErrorCode::AlertAlreadyResolved => StatusCode::CONFLICT,

            ErrorCode::Unknown | ErrorCode::InternalError | ErrorCode::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.code(), self.message())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            1001 => Ok(ErrorCode::SlotNotFound),
            1002 => Ok(ErrorCode::SlotInactive),
            1003 => Ok(ErrorCode::CapacityExceeded),
            1004 => Ok(ErrorCode::SlotAlreadyExists),
            2001 => Ok(ErrorCode::BookingNotFound),
            2002 => Ok(ErrorCode::InvalidTransition),
            2003 => Ok(ErrorCode::EmptyQueue),
            3001 => Ok(ErrorCode::AlertNotFound),
            3002 => Ok(ErrorCode::AlertAlreadyResolved),
            4001 => Ok(ErrorCode::RangeInvalid),
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::CapacityExceeded.code(), 1003);
        assert_eq!(ErrorCode::InvalidTransition.code(), 2002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::SlotNotFound,
            ErrorCode::CapacityExceeded,
            ErrorCode::EmptyQueue,
            ErrorCode::AlertAlreadyResolved,
            ErrorCode::RangeInvalid,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert!(ErrorCode::try_from(65535).is_err());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            ErrorCode::CapacityExceeded.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::SlotNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::RangeInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::StorageError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::CapacityExceeded).unwrap();
        assert_eq!(json, "1003");
        let code: ErrorCode = serde_json::from_str("2003").unwrap();
        assert_eq!(code, ErrorCode::EmptyQueue);
    }
}

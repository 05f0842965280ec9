//! Booking engine errors

use shared::models::BookingStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Errors surfaced by the capacity ledger and booking queue
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Slot instance not found: {0}")]
    SlotNotFound(String),

    #[error("Slot is not open for booking: {0}")]
    SlotInactive(String),

    #[error("Slot capacity has been reached: {0}")]
    CapacityExceeded(String),

    #[error("Slot instance already exists: {0}")]
    SlotAlreadyExists(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid transition for booking {booking_id}: {from} -> {to}")]
    InvalidTransition {
        booking_id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("No pending bookings for slot: {0}")]
    EmptyQueue(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = match &err {
            BookingError::SlotNotFound(_) => ErrorCode::SlotNotFound,
            BookingError::SlotInactive(_) => ErrorCode::SlotInactive,
            BookingError::CapacityExceeded(_) => ErrorCode::CapacityExceeded,
            BookingError::SlotAlreadyExists(_) => ErrorCode::SlotAlreadyExists,
            BookingError::BookingNotFound(_) => ErrorCode::BookingNotFound,
            BookingError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            BookingError::EmptyQueue(_) => ErrorCode::EmptyQueue,
        };
        AppError::with_message(code, err.to_string())
    }
}

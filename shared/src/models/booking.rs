//! Booking Model
//!
//! A booking is never hard-deleted: `Served` and `Cancelled` are terminal
//! states retained for history. The transition table is explicit; anything
//! not listed is rejected by the engine with `InvalidTransition`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status
///
/// ```text
/// PENDING --call_next--> SERVING --mark_served--> SERVED
/// PENDING --cancel-----> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Serving,
    Served,
    Cancelled,
}

impl BookingStatus {
    /// Whether this status accepts no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Served | BookingStatus::Cancelled)
    }

    /// Exhaustive transition table
    pub const fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Serving)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Serving, BookingStatus::Served)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Serving => write!(f, "serving"),
            BookingStatus::Served => write!(f, "served"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One menu line in a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLine {
    /// Menu item reference (String ID)
    pub menu_item_id: String,
    pub quantity: u32,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Booking reference (String ID)
    pub id: String,
    /// Student who created the booking
    pub student_id: String,
    pub slot_instance_id: String,
    pub items: Vec<BookingLine>,
    pub status: BookingStatus,
    /// Human-readable token, assigned once at creation, never reused
    pub token_number: String,
    /// 1-based rank among pending bookings; 0 once out of the queue
    pub queue_position: u32,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking still consumes queue ordering
    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }

    /// Whether this booking counts toward live occupancy
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Serving)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Serving));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Serving.can_transition_to(BookingStatus::Served));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Served));
        assert!(!BookingStatus::Serving.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Serving.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Served.can_transition_to(BookingStatus::Serving));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Served.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(BookingStatus::Served.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Serving.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BookingStatus::Serving).unwrap();
        assert_eq!(json, "\"SERVING\"");
    }
}

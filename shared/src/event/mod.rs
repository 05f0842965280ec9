//! Engine event types
//!
//! Events broadcast by the engine after every committed mutation. The
//! notification/UI layer subscribes to render queue and alert state in
//! real time; the engine only emits, it never calls into the UI.

use crate::models::{Alert, BookingStatus, CrowdLevel};
use serde::{Deserialize, Serialize};

/// Events emitted by the booking engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanteenEvent {
    /// A booking was admitted and queued
    BookingCreated {
        booking_id: String,
        slot_instance_id: String,
        student_id: String,
        token_number: String,
        queue_position: u32,
    },
    /// A booking moved through its state machine
    BookingStatusChanged {
        booking_id: String,
        slot_instance_id: String,
        status: BookingStatus,
    },
    /// Occupancy for a slot instance changed
    OccupancyChanged {
        slot_instance_id: String,
        level: CrowdLevel,
        occupancy_rate: u8,
        active_bookings: u32,
        total_capacity: u32,
    },
    /// An overcrowding alert was created
    AlertRaised { alert: Alert },
    /// An alert was resolved, manually or by occupancy falling back
    AlertResolved {
        alert_id: String,
        slot_instance_id: String,
        auto: bool,
    },
}

impl CanteenEvent {
    /// The slot instance this event concerns
    pub fn slot_instance_id(&self) -> &str {
        match self {
            CanteenEvent::BookingCreated {
                slot_instance_id, ..
            }
            | CanteenEvent::BookingStatusChanged {
                slot_instance_id, ..
            }
            | CanteenEvent::OccupancyChanged {
                slot_instance_id, ..
            }
            | CanteenEvent::AlertResolved {
                slot_instance_id, ..
            } => slot_instance_id,
            CanteenEvent::AlertRaised { alert } => &alert.slot_instance_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let event = CanteenEvent::BookingStatusChanged {
            booking_id: "b1".to_string(),
            slot_instance_id: "s1".to_string(),
            status: BookingStatus::Serving,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"BOOKING_STATUS_CHANGED\""));
        assert!(json.contains("\"status\":\"SERVING\""));
    }

    #[test]
    fn test_slot_instance_id_accessor() {
        let event = CanteenEvent::OccupancyChanged {
            slot_instance_id: "slot-42".to_string(),
            level: CrowdLevel::High,
            occupancy_rate: 85,
            active_bookings: 17,
            total_capacity: 20,
        };
        assert_eq!(event.slot_instance_id(), "slot-42");
    }
}

//! Domain models for the canteen booking platform

pub mod alert;
pub mod booking;
pub mod menu_item;
pub mod slot;

pub use alert::{Alert, AlertSeverity};
pub use booking::{Booking, BookingLine, BookingStatus};
pub use menu_item::MenuItem;
pub use slot::{CrowdLevel, MealName, SlotInstance, SlotTemplate};

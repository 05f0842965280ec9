//! Booking admission and queue engine
//!
//! - **ledger**: per-instance capacity accounting (no overbooking)
//! - **queue**: FIFO token queue mechanics on the slot cell
//! - **manager**: command processor tying admission, queue, occupancy
//!   and events together
//! - **wait_time**: linear wait estimation
//!
//! All state is in memory; slot instances are registered per service
//! day and dropped with the process.

pub mod error;
pub mod ledger;
pub mod manager;
pub mod queue;
pub mod wait_time;

pub use error::{BookingError, BookingResult};
pub use ledger::{SlotCell, SlotRegistry};
pub use manager::{
    AdmissionReceipt, BookingManager, BookingRequest, EVENT_CHANNEL_CAPACITY, QueueEntry,
    QueueStatus,
};

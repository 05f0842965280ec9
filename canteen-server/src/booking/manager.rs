//! BookingManager - admission pipeline and queue commands
//!
//! # Admission Flow
//!
//! ```text
//! create_booking(req)
//!     ├─ 1. Look up slot cell, take its mutex
//!     ├─ 2. Ledger check-and-increment (no overbooking)
//!     ├─ 3. Assign token (monotonic per instance)
//!     ├─ 4. Enqueue, assign 1-based queue position
//!     ├─ 5. Recompute occupancy, notify alert manager
//!     ├─ 6. Release the mutex
//!     ├─ 7. Broadcast event(s)
//!     └─ 8. Return admission receipt
//! ```
//!
//! Steps 2-5 form the per-slot critical section: two concurrent
//! admissions for the same instance can never both pass a full capacity
//! check, and call_next is serialized against enqueue/cancel. Lock hold
//! time is O(queue length) pointer work, no I/O.
//!
//! Every mutating command either fully applies or fails with no side
//! effect; events are broadcast only after the mutation committed.

use super::error::{BookingError, BookingResult};
use super::ledger::{SlotCell, SlotRegistry};
use super::wait_time;
use crate::analytics::OccupancyLog;
use crate::crowd::{AlertManager, Occupancy, classify};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::MutexGuard;
use serde::{Deserialize, Serialize};
use shared::event::CanteenEvent;
use shared::models::{Booking, BookingLine, BookingStatus};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 16384;

/// Admission request from the API layer
///
/// Identity comes from the auth collaborator upstream; the engine
/// trusts `student_id` as given.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub student_id: String,
    pub slot_instance_id: String,
    pub items: Vec<BookingLine>,
}

/// Result of a granted admission
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionReceipt {
    pub booking: Booking,
    pub estimated_wait_minutes: u32,
    pub occupancy: Occupancy,
}

/// One pending booking as seen by the queue display
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub booking_id: String,
    pub token_number: String,
    pub queue_position: u32,
    pub estimated_wait_minutes: u32,
}

/// Live queue view for one slot instance
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    pub slot_instance_id: String,
    pub occupancy: Occupancy,
    pub serving: u32,
    pub pending: Vec<QueueEntry>,
}

/// Core command processor for bookings
///
/// Owns the booking store; slot cells are owned by the registry and
/// locked per instance. Store guards are only ever taken while holding
/// the cell mutex (or for read-only snapshots), never the other way
/// around.
pub struct BookingManager {
    registry: Arc<SlotRegistry>,
    bookings: DashMap<String, Booking>,
    alerts: Arc<AlertManager>,
    occupancy_log: Arc<OccupancyLog>,
    event_tx: broadcast::Sender<CanteenEvent>,
    default_avg_service_minutes: u32,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("bookings", &self.bookings.len())
            .finish()
    }
}

impl BookingManager {
    pub fn new(
        registry: Arc<SlotRegistry>,
        alerts: Arc<AlertManager>,
        occupancy_log: Arc<OccupancyLog>,
        event_tx: broadcast::Sender<CanteenEvent>,
        default_avg_service_minutes: u32,
    ) -> Self {
        Self {
            registry,
            bookings: DashMap::new(),
            alerts,
            occupancy_log,
            event_tx,
            default_avg_service_minutes,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<CanteenEvent> {
        self.event_tx.subscribe()
    }

    /// The slot registry backing this manager
    pub fn registry(&self) -> Arc<SlotRegistry> {
        Arc::clone(&self.registry)
    }

    /// Admit a booking against a slot instance
    pub fn create_booking(&self, req: BookingRequest) -> BookingResult<AdmissionReceipt> {
        let cell = self.registry.get(&req.slot_instance_id)?;
        let mut guard = cell.lock();

        let new_count = guard.try_admit()?;
        let token_number = guard.next_token();
        let mut booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: req.student_id,
            slot_instance_id: req.slot_instance_id.clone(),
            items: req.items,
            status: BookingStatus::Pending,
            token_number: token_number.clone(),
            queue_position: 0,
            created_at: Utc::now(),
        };
        booking.queue_position = guard.enqueue(&booking.id);
        self.bookings.insert(booking.id.clone(), booking.clone());

        let mut events = vec![CanteenEvent::BookingCreated {
            booking_id: booking.id.clone(),
            slot_instance_id: booking.slot_instance_id.clone(),
            student_id: booking.student_id.clone(),
            token_number: booking.token_number.clone(),
            queue_position: booking.queue_position,
        }];
        let occupancy = self.recompute_occupancy(&mut guard, &mut events);
        let estimated_wait_minutes =
            wait_time::estimate(booking.queue_position, self.avg_service_minutes(&guard));
        drop(guard);

        tracing::info!(
            booking_id = %booking.id,
            slot_instance_id = %booking.slot_instance_id,
            token = %token_number,
            occupancy = new_count,
            "Booking admitted"
        );
        self.broadcast(events);
        Ok(AdmissionReceipt {
            booking,
            estimated_wait_minutes,
            occupancy,
        })
    }

    /// Dequeue the next pending booking for serving (staff call-out)
    pub fn call_next(&self, slot_instance_id: &str) -> BookingResult<Booking> {
        let cell = self.registry.get(slot_instance_id)?;
        let mut guard = cell.lock();

        let booking_id = guard
            .call_next()
            .ok_or_else(|| BookingError::EmptyQueue(slot_instance_id.to_string()))?;
        let updated = {
            let mut booking = self
                .bookings
                .get_mut(&booking_id)
                .ok_or_else(|| BookingError::BookingNotFound(booking_id.clone()))?;
            debug_assert!(booking.status.can_transition_to(BookingStatus::Serving));
            booking.status = BookingStatus::Serving;
            booking.queue_position = 0;
            booking.clone()
        };
        self.refresh_positions(&guard);

        let mut events = vec![CanteenEvent::BookingStatusChanged {
            booking_id: updated.id.clone(),
            slot_instance_id: slot_instance_id.to_string(),
            status: BookingStatus::Serving,
        }];
        self.recompute_occupancy(&mut guard, &mut events);
        drop(guard);

        tracing::info!(
            booking_id = %updated.id,
            token = %updated.token_number,
            slot_instance_id,
            "Booking called for serving"
        );
        self.broadcast(events);
        Ok(updated)
    }

    /// Transition a serving booking to served
    pub fn mark_served(&self, booking_id: &str) -> BookingResult<Booking> {
        let slot_instance_id = self.slot_of(booking_id)?;
        let cell = self.registry.get(&slot_instance_id)?;
        let mut guard = cell.lock();

        let updated = {
            let mut booking = self
                .bookings
                .get_mut(booking_id)
                .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
            if !booking.status.can_transition_to(BookingStatus::Served) {
                return Err(BookingError::InvalidTransition {
                    booking_id: booking_id.to_string(),
                    from: booking.status,
                    to: BookingStatus::Served,
                });
            }
            booking.status = BookingStatus::Served;
            booking.clone()
        };
        guard.finish_serving();

        let mut events = vec![CanteenEvent::BookingStatusChanged {
            booking_id: booking_id.to_string(),
            slot_instance_id: slot_instance_id.clone(),
            status: BookingStatus::Served,
        }];
        self.recompute_occupancy(&mut guard, &mut events);
        drop(guard);

        tracing::info!(booking_id, slot_instance_id = %slot_instance_id, "Booking served");
        self.broadcast(events);
        Ok(updated)
    }

    /// Cancel a pending booking and free its seat
    pub fn cancel(&self, booking_id: &str) -> BookingResult<Booking> {
        let slot_instance_id = self.slot_of(booking_id)?;
        let cell = self.registry.get(&slot_instance_id)?;
        let mut guard = cell.lock();

        let updated = {
            let mut booking = self
                .bookings
                .get_mut(booking_id)
                .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
            if !booking.status.can_transition_to(BookingStatus::Cancelled) {
                return Err(BookingError::InvalidTransition {
                    booking_id: booking_id.to_string(),
                    from: booking.status,
                    to: BookingStatus::Cancelled,
                });
            }
            booking.status = BookingStatus::Cancelled;
            booking.queue_position = 0;
            booking.clone()
        };
        guard.remove_pending(booking_id);
        guard.release();
        self.refresh_positions(&guard);

        let mut events = vec![CanteenEvent::BookingStatusChanged {
            booking_id: booking_id.to_string(),
            slot_instance_id: slot_instance_id.clone(),
            status: BookingStatus::Cancelled,
        }];
        self.recompute_occupancy(&mut guard, &mut events);
        drop(guard);

        tracing::info!(booking_id, slot_instance_id = %slot_instance_id, "Booking cancelled");
        self.broadcast(events);
        Ok(updated)
    }

    /// Get a booking by id
    pub fn get_booking(&self, booking_id: &str) -> BookingResult<Booking> {
        self.bookings
            .get(booking_id)
            .map(|b| b.clone())
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))
    }

    /// A booking plus its current wait estimate (pending only)
    pub fn booking_with_wait(&self, booking_id: &str) -> BookingResult<(Booking, Option<u32>)> {
        let booking = self.get_booking(booking_id)?;
        if !booking.is_pending() {
            return Ok((booking, None));
        }
        let cell = self.registry.get(&booking.slot_instance_id)?;
        let guard = cell.lock();
        // Re-read position under the lock; it may have moved
        let booking = self.get_booking(booking_id)?;
        let wait = wait_time::estimate(booking.queue_position, self.avg_service_minutes(&guard));
        Ok((booking, Some(wait)))
    }

    /// Live queue view for one slot instance
    pub fn queue_status(&self, slot_instance_id: &str) -> BookingResult<QueueStatus> {
        let cell = self.registry.get(slot_instance_id)?;
        let guard = cell.lock();
        let avg = self.avg_service_minutes(&guard);

        let pending = guard
            .pending_ids()
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let position = (idx + 1) as u32;
                QueueEntry {
                    booking_id: id.clone(),
                    token_number: self
                        .bookings
                        .get(id)
                        .map(|b| b.token_number.clone())
                        .unwrap_or_default(),
                    queue_position: position,
                    estimated_wait_minutes: wait_time::estimate(position, avg),
                }
            })
            .collect();

        Ok(QueueStatus {
            slot_instance_id: slot_instance_id.to_string(),
            occupancy: classify(guard.active_count(), guard.instance.capacity),
            serving: guard.serving,
            pending,
        })
    }

    /// Classified occupancy for one slot instance
    pub fn occupancy(&self, slot_instance_id: &str) -> BookingResult<Occupancy> {
        let cell = self.registry.get(slot_instance_id)?;
        let guard = cell.lock();
        Ok(classify(guard.active_count(), guard.instance.capacity))
    }

    /// Snapshot of every booking, for read-only rollups
    pub fn bookings_snapshot(&self) -> Vec<Booking> {
        self.bookings.iter().map(|entry| entry.value().clone()).collect()
    }

    fn slot_of(&self, booking_id: &str) -> BookingResult<String> {
        self.bookings
            .get(booking_id)
            .map(|b| b.slot_instance_id.clone())
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))
    }

    fn avg_service_minutes(&self, guard: &MutexGuard<'_, SlotCell>) -> u32 {
        guard
            .instance
            .avg_service_minutes
            .unwrap_or(self.default_avg_service_minutes)
    }

    /// Rewrite queue positions to match the 1-based FIFO rank
    fn refresh_positions(&self, guard: &MutexGuard<'_, SlotCell>) {
        for (idx, id) in guard.pending_ids().iter().enumerate() {
            if let Some(mut booking) = self.bookings.get_mut(id) {
                booking.queue_position = (idx + 1) as u32;
            }
        }
    }

    /// Reclassify occupancy, log a snapshot, and notify the alert
    /// manager. Emits an OccupancyChanged event only when the rate
    /// actually moved.
    fn recompute_occupancy(
        &self,
        guard: &mut MutexGuard<'_, SlotCell>,
        events: &mut Vec<CanteenEvent>,
    ) -> Occupancy {
        let occupancy = classify(guard.active_count(), guard.instance.capacity);
        self.occupancy_log.record(&guard.instance.id, &occupancy);
        self.alerts.on_occupancy_changed(&guard.instance.id, &occupancy);
        if guard.last_rate != Some(occupancy.rate) {
            guard.last_rate = Some(occupancy.rate);
            events.push(CanteenEvent::OccupancyChanged {
                slot_instance_id: guard.instance.id.clone(),
                level: occupancy.level,
                occupancy_rate: occupancy.rate,
                active_bookings: occupancy.active_bookings,
                total_capacity: occupancy.total_capacity,
            });
        }
        occupancy
    }

    fn broadcast(&self, events: Vec<CanteenEvent>) {
        for event in events {
            let _ = self.event_tx.send(event);
        }
    }
}

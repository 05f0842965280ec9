//! Slot capacity ledger
//!
//! Tracks capacity and admitted-booking count per slot instance and
//! enforces the no-overbooking invariant. Every slot instance lives
//! behind its own mutex, so check-and-increment, token assignment, and
//! enqueue form a single critical section per instance while different
//! instances never block each other.

use super::error::{BookingError, BookingResult};
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use shared::models::SlotInstance;
use std::collections::VecDeque;
use std::sync::Arc;

/// Live state of one slot instance
///
/// Accessed only through the owning [`SlotRegistry`] mutex. The queue
/// holds pending booking ids in arrival order; `serving` counts
/// bookings called but not yet served.
#[derive(Debug)]
pub struct SlotCell {
    pub instance: SlotInstance,
    /// Monotonic token sequence, never reused within the instance
    pub(crate) token_seq: u32,
    /// Pending booking ids, FIFO
    pub(crate) pending: VecDeque<String>,
    /// Bookings in SERVING state
    pub(crate) serving: u32,
    /// Last occupancy rate emitted, used to suppress duplicate events
    pub(crate) last_rate: Option<u8>,
}

impl SlotCell {
    fn new(instance: SlotInstance) -> Self {
        Self {
            instance,
            token_seq: 0,
            pending: VecDeque::new(),
            serving: 0,
            last_rate: None,
        }
    }

    /// Atomically check `current_bookings < capacity` and increment.
    ///
    /// Returns the new occupancy count. The caller must hold the cell
    /// mutex, which makes the check-and-increment race-free.
    pub fn try_admit(&mut self) -> BookingResult<u32> {
        if !self.instance.is_active {
            return Err(BookingError::SlotInactive(self.instance.id.clone()));
        }
        if self.instance.current_bookings >= self.instance.capacity {
            return Err(BookingError::CapacityExceeded(self.instance.id.clone()));
        }
        self.instance.current_bookings += 1;
        Ok(self.instance.current_bookings)
    }

    /// Free one admitted seat. Called on cancellation only; served
    /// bookings keep their seat for the life of the instance.
    pub fn release(&mut self) {
        debug_assert!(self.instance.current_bookings > 0);
        self.instance.current_bookings = self.instance.current_bookings.saturating_sub(1);
    }

    /// Bookings counting toward live occupancy (pending + serving)
    pub fn active_count(&self) -> u32 {
        self.pending.len() as u32 + self.serving
    }
}

/// Registry of slot instances keyed by instance id
///
/// Uniqueness per (template, date) is enforced at registration.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: DashMap<String, Arc<Mutex<SlotCell>>>,
    by_template_date: DashMap<(String, NaiveDate), String>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a materialized slot instance
    ///
    /// Uniqueness per (template, date) is a check-and-set through the
    /// entry lock, so concurrent registrations for the same slot-day
    /// cannot both succeed.
    pub fn register(&self, instance: SlotInstance) -> BookingResult<()> {
        let key = (instance.template_id.clone(), instance.date);
        match self.by_template_date.entry(key) {
            Entry::Occupied(_) => Err(BookingError::SlotAlreadyExists(instance.id)),
            Entry::Vacant(slot_day) => {
                let id = instance.id.clone();
                match self.slots.entry(id.clone()) {
                    Entry::Occupied(_) => Err(BookingError::SlotAlreadyExists(id)),
                    Entry::Vacant(cell) => {
                        cell.insert(Arc::new(Mutex::new(SlotCell::new(instance))));
                        slot_day.insert(id.clone());
                        tracing::info!(slot_instance_id = %id, "Slot instance registered");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Get the cell for a slot instance
    pub fn get(&self, slot_instance_id: &str) -> BookingResult<Arc<Mutex<SlotCell>>> {
        self.slots
            .get(slot_instance_id)
            .map(|cell| Arc::clone(&cell))
            .ok_or_else(|| BookingError::SlotNotFound(slot_instance_id.to_string()))
    }

    /// Current snapshot of one instance
    pub fn snapshot(&self, slot_instance_id: &str) -> BookingResult<SlotInstance> {
        let cell = self.get(slot_instance_id)?;
        let guard = cell.lock();
        Ok(guard.instance.clone())
    }

    /// Snapshots of all registered instances
    pub fn list(&self) -> Vec<SlotInstance> {
        self.slots
            .iter()
            .map(|entry| entry.value().lock().instance.clone())
            .collect()
    }

    /// Snapshots of all instances for a given date
    pub fn list_for_date(&self, date: NaiveDate) -> Vec<SlotInstance> {
        self.list()
            .into_iter()
            .filter(|slot| slot.date == date)
            .collect()
    }

    /// Open or close an instance for booking
    pub fn set_active(&self, slot_instance_id: &str, active: bool) -> BookingResult<()> {
        let cell = self.get(slot_instance_id)?;
        cell.lock().instance.is_active = active;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MealName, SlotTemplate};

    fn lunch_instance(capacity: u32) -> SlotInstance {
        let template = SlotTemplate {
            id: "tmpl-lunch".to_string(),
            name: MealName::Lunch,
            start_time: "12:00".to_string(),
            end_time: "14:00".to_string(),
            default_capacity: capacity,
            avg_service_minutes: None,
        };
        SlotInstance::from_template(&template, NaiveDate::from_ymd_opt(2026, 8, 27).unwrap())
    }

    #[test]
    fn test_admit_until_full() {
        let registry = SlotRegistry::new();
        let instance = lunch_instance(3);
        let id = instance.id.clone();
        registry.register(instance).unwrap();

        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();
        assert_eq!(guard.try_admit().unwrap(), 1);
        assert_eq!(guard.try_admit().unwrap(), 2);
        assert_eq!(guard.try_admit().unwrap(), 3);
        assert_eq!(
            guard.try_admit(),
            Err(BookingError::CapacityExceeded(id.clone()))
        );
        assert_eq!(guard.instance.current_bookings, 3);
    }

    #[test]
    fn test_release_frees_one_seat() {
        let registry = SlotRegistry::new();
        let instance = lunch_instance(1);
        let id = instance.id.clone();
        registry.register(instance).unwrap();

        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();
        guard.try_admit().unwrap();
        assert!(guard.try_admit().is_err());
        guard.release();
        assert_eq!(guard.try_admit().unwrap(), 1);
    }

    #[test]
    fn test_inactive_slot_rejects_admission() {
        let registry = SlotRegistry::new();
        let instance = lunch_instance(10);
        let id = instance.id.clone();
        registry.register(instance).unwrap();
        registry.set_active(&id, false).unwrap();

        let cell = registry.get(&id).unwrap();
        assert_eq!(
            cell.lock().try_admit(),
            Err(BookingError::SlotInactive(id))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = SlotRegistry::new();
        let instance = lunch_instance(10);
        registry.register(instance.clone()).unwrap();

        // Same (template, date) pair, fresh id
        let mut dup = instance.clone();
        dup.id = "other-id".to_string();
        assert!(matches!(
            registry.register(dup),
            Err(BookingError::SlotAlreadyExists(_))
        ));
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        use std::sync::Barrier;

        const THREADS: usize = 4;
        const ROUNDS: usize = 200;

        for _ in 0..ROUNDS {
            let registry = SlotRegistry::new();
            let barrier = Barrier::new(THREADS);

            let successes: usize = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|_| {
                        let registry = &registry;
                        let barrier = &barrier;
                        // Same (template, date), fresh instance ids
                        let instance = lunch_instance(10);
                        scope.spawn(move || {
                            barrier.wait();
                            registry.register(instance).is_ok()
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap())
                    .filter(|won| *won)
                    .count()
            });

            assert_eq!(successes, 1);
            assert_eq!(registry.list().len(), 1);
        }
    }

    #[test]
    fn test_unknown_slot() {
        let registry = SlotRegistry::new();
        assert!(matches!(
            registry.snapshot("missing"),
            Err(BookingError::SlotNotFound(_))
        ));
    }
}

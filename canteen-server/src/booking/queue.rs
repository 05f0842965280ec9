//! Per-slot FIFO queue operations
//!
//! Queue mechanics on [`SlotCell`]: token assignment, enqueue, FIFO
//! dequeue, and pending removal. Order is arrival order under the cell
//! mutex, which is exactly (created_at, insertion sequence); token
//! numbers play no part in ordering. Position recomputation for the
//! bookings left behind is done by the manager, which owns the store.

use super::ledger::SlotCell;

impl SlotCell {
    /// Assign the next token for this instance
    ///
    /// Monotonic per slot instance, never reused even after
    /// cancellation. Format: `{meal-prefix}-{seq:03}`, e.g. `L-012`.
    pub fn next_token(&mut self) -> String {
        self.token_seq += 1;
        format!(
            "{}-{:03}",
            self.instance.name.token_prefix(),
            self.token_seq
        )
    }

    /// Append a pending booking, returning its 1-based queue position
    pub fn enqueue(&mut self, booking_id: &str) -> u32 {
        self.pending.push_back(booking_id.to_string());
        self.pending.len() as u32
    }

    /// Dequeue the booking at the head of the FIFO queue
    ///
    /// Returns `None` when no booking is pending. The dequeued booking
    /// is counted as serving until [`SlotCell::finish_serving`].
    pub fn call_next(&mut self) -> Option<String> {
        let id = self.pending.pop_front()?;
        self.serving += 1;
        Some(id)
    }

    /// A serving booking was marked served
    pub fn finish_serving(&mut self) {
        debug_assert!(self.serving > 0);
        self.serving = self.serving.saturating_sub(1);
    }

    /// Remove a pending booking (cancellation), preserving FIFO order
    /// of the rest. Returns false when the id is not queued.
    pub fn remove_pending(&mut self, booking_id: &str) -> bool {
        match self.pending.iter().position(|id| id == booking_id) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Pending booking ids in queue order
    pub fn pending_ids(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    /// Number of pending bookings
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::ledger::SlotRegistry;
    use shared::models::{MealName, SlotInstance, SlotTemplate};

    fn dinner_cell() -> (SlotRegistry, String) {
        let template = SlotTemplate {
            id: "tmpl-dinner".to_string(),
            name: MealName::Dinner,
            start_time: "19:00".to_string(),
            end_time: "21:00".to_string(),
            default_capacity: 20,
            avg_service_minutes: None,
        };
        let instance = SlotInstance::from_template(
            &template,
            chrono::NaiveDate::from_ymd_opt(2026, 8, 27).unwrap(),
        );
        let id = instance.id.clone();
        let registry = SlotRegistry::new();
        registry.register(instance).unwrap();
        (registry, id)
    }

    #[test]
    fn test_token_format_and_monotonicity() {
        let (registry, id) = dinner_cell();
        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();

        assert_eq!(guard.next_token(), "D-001");
        assert_eq!(guard.next_token(), "D-002");
        assert_eq!(guard.next_token(), "D-003");
    }

    #[test]
    fn test_tokens_not_reused_after_cancel() {
        let (registry, id) = dinner_cell();
        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();

        let _t1 = guard.next_token();
        guard.enqueue("b1");
        guard.remove_pending("b1");
        // next booking still gets a fresh token
        assert_eq!(guard.next_token(), "D-002");
    }

    #[test]
    fn test_fifo_dequeue_order() {
        let (registry, id) = dinner_cell();
        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();

        guard.enqueue("a");
        guard.enqueue("b");
        guard.enqueue("c");

        assert_eq!(guard.call_next().as_deref(), Some("a"));
        assert_eq!(guard.call_next().as_deref(), Some("b"));
        assert_eq!(guard.call_next().as_deref(), Some("c"));
        assert_eq!(guard.call_next(), None);
        assert_eq!(guard.serving, 3);
    }

    #[test]
    fn test_fifo_stable_under_middle_cancel() {
        let (registry, id) = dinner_cell();
        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();

        guard.enqueue("a");
        guard.enqueue("b");
        guard.enqueue("c");
        assert!(guard.remove_pending("b"));

        assert_eq!(guard.pending_ids(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(guard.call_next().as_deref(), Some("a"));
        assert_eq!(guard.call_next().as_deref(), Some("c"));
    }

    #[test]
    fn test_remove_unknown_pending() {
        let (registry, id) = dinner_cell();
        let cell = registry.get(&id).unwrap();
        let mut guard = cell.lock();
        guard.enqueue("a");
        assert!(!guard.remove_pending("ghost"));
        assert_eq!(guard.pending_len(), 1);
    }
}

//! Overcrowding alert management
//!
//! Watches occupancy transitions reported by the booking engine.
//! Invariant: at most one unresolved alert per slot instance. A second
//! breach while one is open is suppressed, never a duplicate. The
//! check-and-set goes through the `open` map entry for the slot
//! instance, which is atomic per key, so concurrent occupancy
//! notifications cannot raise two alerts.

use crate::crowd::classifier::{MEDIUM_THRESHOLD, Occupancy};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::event::CanteenEvent;
use shared::models::{Alert, AlertSeverity, CrowdLevel};
use shared::{AppError, ErrorCode};
use thiserror::Error;
use tokio::sync::broadcast;

/// Occupancy rate from which alerts are tagged CRITICAL
pub const CRITICAL_THRESHOLD: u8 = 90;

/// Alert manager errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),
}

pub type AlertResult<T> = Result<T, AlertError>;

impl From<AlertError> for AppError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::NotFound(_) => AppError::with_message(ErrorCode::AlertNotFound, err.to_string()),
        }
    }
}

/// Owns every alert and the one-open-alert-per-slot invariant
pub struct AlertManager {
    /// All alerts by id, open and resolved, retained for history
    alerts: DashMap<String, Alert>,
    /// slot_instance_id -> id of the single unresolved alert
    open: DashMap<String, String>,
    event_tx: broadcast::Sender<CanteenEvent>,
}

impl std::fmt::Debug for AlertManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertManager")
            .field("alerts", &self.alerts.len())
            .field("open", &self.open.len())
            .finish()
    }
}

impl AlertManager {
    pub fn new(event_tx: broadcast::Sender<CanteenEvent>) -> Self {
        Self {
            alerts: DashMap::new(),
            open: DashMap::new(),
            event_tx,
        }
    }

    /// React to an occupancy change for a slot instance
    ///
    /// Raises an alert on a HIGH breach when none is open; auto-resolves
    /// the open alert once occupancy falls back below the MEDIUM
    /// threshold. Idempotent under concurrent notifications.
    pub fn on_occupancy_changed(&self, slot_instance_id: &str, occupancy: &Occupancy) {
        if occupancy.level == CrowdLevel::High {
            // Entry lock makes the no-duplicate check-and-set atomic per slot
            match self.open.entry(slot_instance_id.to_string()) {
                Entry::Occupied(_) => {
                    tracing::debug!(
                        slot_instance_id,
                        rate = occupancy.rate,
                        "Breach while alert already open, suppressed"
                    );
                }
                Entry::Vacant(entry) => {
                    let alert = Self::build_alert(slot_instance_id, occupancy);
                    let alert_id = alert.id.clone();
                    tracing::warn!(
                        slot_instance_id,
                        alert_id = %alert_id,
                        rate = occupancy.rate,
                        severity = %alert.severity,
                        "Overcrowding alert raised"
                    );
                    self.alerts.insert(alert_id.clone(), alert.clone());
                    entry.insert(alert_id);
                    let _ = self.event_tx.send(CanteenEvent::AlertRaised { alert });
                }
            }
        } else if occupancy.rate < MEDIUM_THRESHOLD {
            // Back to low: auto-resolve whatever is open
            if let Some((_, alert_id)) = self.open.remove(slot_instance_id) {
                if let Some(mut alert) = self.alerts.get_mut(&alert_id) {
                    alert.resolved = true;
                    alert.resolved_at = Some(Utc::now());
                    alert.resolution_notes = Some(format!(
                        "Auto-resolved: occupancy back to {}%",
                        occupancy.rate
                    ));
                }
                tracing::info!(slot_instance_id, alert_id = %alert_id, "Alert auto-resolved");
                let _ = self.event_tx.send(CanteenEvent::AlertResolved {
                    alert_id,
                    slot_instance_id: slot_instance_id.to_string(),
                    auto: true,
                });
            }
        }
    }

    /// Manually resolve an alert, regardless of current occupancy
    ///
    /// Resolving an already-resolved alert is a no-op (tolerates
    /// double-click resolution from concurrent staff UIs). A later
    /// breach creates a fresh alert, never a reopening.
    pub fn resolve(&self, alert_id: &str, notes: impl Into<String>) -> AlertResult<Alert> {
        let resolved = {
            let mut alert = self
                .alerts
                .get_mut(alert_id)
                .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))?;
            if alert.resolved {
                return Ok(alert.clone());
            }
            alert.resolved = true;
            alert.resolved_at = Some(Utc::now());
            alert.resolution_notes = Some(notes.into());
            alert.clone()
        };

        self.open
            .remove_if(&resolved.slot_instance_id, |_, open_id| open_id == alert_id);

        tracing::info!(alert_id, slot_instance_id = %resolved.slot_instance_id, "Alert resolved");
        let _ = self.event_tx.send(CanteenEvent::AlertResolved {
            alert_id: alert_id.to_string(),
            slot_instance_id: resolved.slot_instance_id.clone(),
            auto: false,
        });
        Ok(resolved)
    }

    /// Get an alert by id
    pub fn get(&self, alert_id: &str) -> AlertResult<Alert> {
        self.alerts
            .get(alert_id)
            .map(|a| a.clone())
            .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))
    }

    /// The unresolved alert for a slot instance, if any
    pub fn open_alert_for(&self, slot_instance_id: &str) -> Option<Alert> {
        let alert_id = self.open.get(slot_instance_id)?.clone();
        self.alerts.get(&alert_id).map(|a| a.clone())
    }

    /// All alerts, optionally filtered by resolution state
    pub fn list(&self, resolved: Option<bool>) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|alert| resolved.is_none_or(|r| alert.resolved == r))
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    fn build_alert(slot_instance_id: &str, occupancy: &Occupancy) -> Alert {
        let severity = if occupancy.rate >= CRITICAL_THRESHOLD {
            AlertSeverity::Critical
        } else {
            AlertSeverity::High
        };
        Alert {
            id: uuid::Uuid::new_v4().to_string(),
            slot_instance_id: slot_instance_id.to_string(),
            severity,
            message: format!(
                "Occupancy at {}% ({}/{} active bookings)",
                occupancy.rate, occupancy.active_bookings, occupancy.total_capacity
            ),
            occupancy_rate: occupancy.rate,
            active_bookings: occupancy.active_bookings,
            total_capacity: occupancy.total_capacity,
            timestamp: Utc::now(),
            resolved: false,
            resolved_at: None,
            resolution_notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crowd::classifier::classify;

    fn manager() -> AlertManager {
        let (tx, _rx) = broadcast::channel(64);
        AlertManager::new(tx)
    }

    #[test]
    fn test_breach_raises_alert() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(8, 10));

        let alert = mgr.open_alert_for("slot-1").unwrap();
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.occupancy_rate, 80);
        assert!(!alert.resolved);
    }

    #[test]
    fn test_critical_severity_from_ninety_percent() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(9, 10));
        assert_eq!(
            mgr.open_alert_for("slot-1").unwrap().severity,
            AlertSeverity::Critical
        );
    }

    #[test]
    fn test_second_breach_suppressed() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(7, 10));
        let first = mgr.open_alert_for("slot-1").unwrap();

        mgr.on_occupancy_changed("slot-1", &classify(9, 10));
        let still_open = mgr.open_alert_for("slot-1").unwrap();
        assert_eq!(first.id, still_open.id);
        assert_eq!(mgr.list(Some(false)).len(), 1);
    }

    #[test]
    fn test_auto_resolve_below_medium() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(8, 10));
        // medium band does not resolve
        mgr.on_occupancy_changed("slot-1", &classify(5, 10));
        assert!(mgr.open_alert_for("slot-1").is_some());
        // low does
        mgr.on_occupancy_changed("slot-1", &classify(3, 10));
        assert!(mgr.open_alert_for("slot-1").is_none());

        let resolved = &mgr.list(Some(true))[0];
        assert!(resolved.resolved);
        assert!(
            resolved
                .resolution_notes
                .as_deref()
                .unwrap()
                .starts_with("Auto-resolved")
        );
    }

    #[test]
    fn test_manual_resolve_and_fresh_alert_on_rebreach() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(8, 10));
        let first = mgr.open_alert_for("slot-1").unwrap();

        let resolved = mgr.resolve(&first.id, "staff cleared the line").unwrap();
        assert!(resolved.resolved);
        assert!(mgr.open_alert_for("slot-1").is_none());

        mgr.on_occupancy_changed("slot-1", &classify(8, 10));
        let second = mgr.open_alert_for("slot-1").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(8, 10));
        let alert = mgr.open_alert_for("slot-1").unwrap();

        mgr.resolve(&alert.id, "first").unwrap();
        let again = mgr.resolve(&alert.id, "second").unwrap();
        assert_eq!(again.resolution_notes.as_deref(), Some("first"));
    }

    #[test]
    fn test_resolve_unknown_alert() {
        let mgr = manager();
        assert!(matches!(
            mgr.resolve("ghost", "n/a"),
            Err(AlertError::NotFound(_))
        ));
    }

    #[test]
    fn test_alerts_independent_per_slot() {
        let mgr = manager();
        mgr.on_occupancy_changed("slot-1", &classify(8, 10));
        mgr.on_occupancy_changed("slot-2", &classify(9, 10));

        assert!(mgr.open_alert_for("slot-1").is_some());
        assert!(mgr.open_alert_for("slot-2").is_some());
        mgr.on_occupancy_changed("slot-1", &classify(0, 10));
        assert!(mgr.open_alert_for("slot-1").is_none());
        assert!(mgr.open_alert_for("slot-2").is_some());
    }
}

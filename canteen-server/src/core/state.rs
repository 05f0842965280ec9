//! Server state - shared service handles
//!
//! `ServerState` holds every engine service behind `Arc`, so cloning it
//! into each request handler is cheap. All state is in memory; slot
//! instances are registered per service day and dropped with the
//! process.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::analytics::{AnalyticsService, ForecastClient, OccupancyLog};
use crate::booking::{BookingManager, EVENT_CHANNEL_CAPACITY, SlotRegistry};
use crate::catalog::CatalogService;
use crate::core::Config;
use crate::crowd::AlertManager;
use shared::event::CanteenEvent;

/// Shared handle to the whole engine
///
/// | Field | Role |
/// |-------|------|
/// | config | Environment configuration (immutable) |
/// | registry | Slot instance registration and lookup |
/// | bookings | Admission, queue, and status commands |
/// | alerts | Overcrowding alert lifecycle |
/// | catalog | Menu price/availability lookups |
/// | analytics | Read-only rollups and forecast |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub registry: Arc<SlotRegistry>,
    pub bookings: Arc<BookingManager>,
    pub alerts: Arc<AlertManager>,
    pub catalog: Arc<CatalogService>,
    pub analytics: Arc<AnalyticsService>,
    pub occupancy_log: Arc<OccupancyLog>,
    event_tx: broadcast::Sender<CanteenEvent>,
}

impl ServerState {
    /// Wire up all services around one event channel
    pub fn new(config: Config) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let registry = Arc::new(SlotRegistry::new());
        let occupancy_log = Arc::new(OccupancyLog::new());
        let alerts = Arc::new(AlertManager::new(event_tx.clone()));
        let catalog = Arc::new(CatalogService::new());
        let bookings = Arc::new(BookingManager::new(
            Arc::clone(&registry),
            Arc::clone(&alerts),
            Arc::clone(&occupancy_log),
            event_tx.clone(),
            config.avg_service_minutes,
        ));

        let forecast = config
            .forecast_service_url
            .as_deref()
            .map(ForecastClient::new);
        if forecast.is_some() {
            tracing::info!(
                url = config.forecast_service_url.as_deref().unwrap_or(""),
                "Forecast service configured"
            );
        }
        let analytics = Arc::new(AnalyticsService::new(
            Arc::clone(&bookings),
            Arc::clone(&alerts),
            Arc::clone(&catalog),
            Arc::clone(&occupancy_log),
            forecast,
        ));

        Self {
            config,
            registry,
            bookings,
            alerts,
            catalog,
            analytics,
            occupancy_log,
            event_tx,
        }
    }

    /// Subscribe to engine event broadcasts
    pub fn subscribe_events(&self) -> broadcast::Receiver<CanteenEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wires_one_event_channel() {
        let state = ServerState::new(Config::with_overrides(5000, 2));
        assert_eq!(state.config.avg_service_minutes, 2);
        let mut rx = state.subscribe_events();

        // Alert manager and booking manager share the channel
        state
            .alerts
            .on_occupancy_changed("slot-x", &crate::crowd::classify(8, 10));
        assert!(matches!(
            rx.try_recv(),
            Ok(CanteenEvent::AlertRaised { .. })
        ));
    }
}

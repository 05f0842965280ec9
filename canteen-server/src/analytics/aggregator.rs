//! Admin-facing analytics rollups
//!
//! Read-only consumer of the booking store, alert history, and the
//! occupancy sample log. Rollups are computed from snapshots, so
//! results may trail a concurrent write by one request; acceptable for
//! a dashboard.

use crate::booking::BookingManager;
use crate::catalog::CatalogService;
use crate::crowd::{AlertManager, Occupancy};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{BookingStatus, MealName};
use shared::{AppError, ErrorCode};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::forecast::{DailyForecast, ForecastClient};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid range: {0}")]
    RangeInvalid(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::RangeInvalid(_) => {
                AppError::with_message(ErrorCode::RangeInvalid, err.to_string())
            }
        }
    }
}

/// One occupancy sample, recorded on every occupancy change
#[derive(Debug, Clone, Serialize)]
pub struct OccupancySnapshot {
    pub slot_instance_id: String,
    pub at: DateTime<Utc>,
    pub occupancy_rate: u8,
    pub active_bookings: u32,
}

/// Append-only in-memory log of occupancy samples
#[derive(Debug, Default)]
pub struct OccupancyLog {
    samples: RwLock<Vec<OccupancySnapshot>>,
}

impl OccupancyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, slot_instance_id: &str, occupancy: &Occupancy) {
        self.samples.write().push(OccupancySnapshot {
            slot_instance_id: slot_instance_id.to_string(),
            at: Utc::now(),
            occupancy_rate: occupancy.rate,
            active_bookings: occupancy.active_bookings,
        });
    }

    /// Samples whose date falls inside [start, end], inclusive
    pub fn samples_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<OccupancySnapshot> {
        self.samples
            .read()
            .iter()
            .filter(|s| {
                let date = s.at.date_naive();
                date >= start && date <= end
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }
}

/// Per-slot-instance booking breakdown
#[derive(Debug, Clone, Serialize)]
pub struct SlotBreakdown {
    pub slot_instance_id: String,
    pub name: MealName,
    pub date: NaiveDate,
    pub total: u32,
    pub pending: u32,
    pub serving: u32,
    pub served: u32,
    pub cancelled: u32,
}

/// One hour of the peak-hour histogram
#[derive(Debug, Clone, Serialize)]
pub struct HourBucket {
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub samples: u32,
    pub peak_occupancy_rate: u8,
    pub avg_occupancy_rate: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertCounts {
    pub total: u32,
    pub open: u32,
    pub resolved: u32,
}

/// Rollup over a caller-supplied date range
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_bookings: u32,
    /// Bookings holding a live token (pending + serving)
    pub active_tokens: u32,
    pub served: u32,
    pub cancelled: u32,
    pub revenue: Decimal,
    pub per_slot: Vec<SlotBreakdown>,
    pub peak_hours: Vec<HourBucket>,
    pub alerts: AlertCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<DailyForecast>>,
}

/// Read-only analytics over the live engine state
pub struct AnalyticsService {
    bookings: Arc<BookingManager>,
    alerts: Arc<AlertManager>,
    catalog: Arc<CatalogService>,
    occupancy_log: Arc<OccupancyLog>,
    forecast: Option<ForecastClient>,
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService")
            .field("forecast", &self.forecast.is_some())
            .finish()
    }
}

impl AnalyticsService {
    pub fn new(
        bookings: Arc<BookingManager>,
        alerts: Arc<AlertManager>,
        catalog: Arc<CatalogService>,
        occupancy_log: Arc<OccupancyLog>,
        forecast: Option<ForecastClient>,
    ) -> Self {
        Self {
            bookings,
            alerts,
            catalog,
            occupancy_log,
            forecast,
        }
    }

    /// Booking/alert rollup for [start, end], inclusive
    pub fn summary(&self, start: NaiveDate, end: NaiveDate) -> AnalyticsResult<BookingSummary> {
        if start > end {
            return Err(AnalyticsError::RangeInvalid(format!(
                "start {start} is after end {end}"
            )));
        }

        let bookings: Vec<_> = self
            .bookings
            .bookings_snapshot()
            .into_iter()
            .filter(|b| {
                let date = b.created_at.date_naive();
                date >= start && date <= end
            })
            .collect();

        let mut active_tokens = 0u32;
        let mut served = 0u32;
        let mut cancelled = 0u32;
        let mut revenue = Decimal::ZERO;
        let mut by_slot: BTreeMap<String, (u32, u32, u32, u32, u32)> = BTreeMap::new();

        for booking in &bookings {
            let counts = by_slot.entry(booking.slot_instance_id.clone()).or_default();
            counts.0 += 1;
            match booking.status {
                BookingStatus::Pending => {
                    active_tokens += 1;
                    counts.1 += 1;
                }
                BookingStatus::Serving => {
                    active_tokens += 1;
                    counts.2 += 1;
                }
                BookingStatus::Served => {
                    served += 1;
                    counts.3 += 1;
                }
                BookingStatus::Cancelled => {
                    cancelled += 1;
                    counts.4 += 1;
                }
            }
            if booking.status != BookingStatus::Cancelled {
                for line in &booking.items {
                    if let Some(price) = self.catalog.price_of(&line.menu_item_id) {
                        revenue += price * Decimal::from(line.quantity);
                    }
                }
            }
        }

        let registry = self.bookings.registry();
        let per_slot = by_slot
            .into_iter()
            .filter_map(|(slot_instance_id, counts)| {
                let instance = registry.snapshot(&slot_instance_id).ok()?;
                Some(SlotBreakdown {
                    slot_instance_id,
                    name: instance.name,
                    date: instance.date,
                    total: counts.0,
                    pending: counts.1,
                    serving: counts.2,
                    served: counts.3,
                    cancelled: counts.4,
                })
            })
            .collect();

        let all_alerts = self.alerts.list(None);
        let open = all_alerts.iter().filter(|a| !a.resolved).count() as u32;
        let alerts = AlertCounts {
            total: all_alerts.len() as u32,
            open,
            resolved: all_alerts.len() as u32 - open,
        };

        Ok(BookingSummary {
            start,
            end,
            total_bookings: bookings.len() as u32,
            active_tokens,
            served,
            cancelled,
            revenue,
            per_slot,
            peak_hours: self.peak_hours(start, end),
            alerts,
            forecast: None,
        })
    }

    /// Summary plus demand forecast, when the service is configured
    /// and reachable
    pub async fn summary_with_forecast(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        forecast_days: u32,
    ) -> AnalyticsResult<BookingSummary> {
        let mut summary = self.summary(start, end)?;
        if let Some(client) = &self.forecast {
            summary.forecast = client.daily(forecast_days).await;
        }
        Ok(summary)
    }

    /// Hour-of-day histogram over the occupancy sample log
    fn peak_hours(&self, start: NaiveDate, end: NaiveDate) -> Vec<HourBucket> {
        let mut buckets: BTreeMap<u32, (u32, u8, u64)> = BTreeMap::new();
        for sample in self.occupancy_log.samples_between(start, end) {
            let bucket = buckets.entry(sample.at.hour()).or_default();
            bucket.0 += 1;
            bucket.1 = bucket.1.max(sample.occupancy_rate);
            bucket.2 += sample.occupancy_rate as u64;
        }
        buckets
            .into_iter()
            .map(|(hour, (samples, peak, sum))| HourBucket {
                hour,
                samples,
                peak_occupancy_rate: peak,
                avg_occupancy_rate: (sum / samples as u64) as u8,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{
        BookingRequest, EVENT_CHANNEL_CAPACITY, SlotRegistry,
    };
    use rust_decimal::prelude::FromPrimitive;
    use shared::models::{BookingLine, MenuItem, SlotInstance, SlotTemplate};
    use tokio::sync::broadcast;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn setup() -> (AnalyticsService, Arc<BookingManager>, String) {
        let template = SlotTemplate {
            id: "tmpl-lunch".to_string(),
            name: MealName::Lunch,
            start_time: "12:00".to_string(),
            end_time: "14:00".to_string(),
            default_capacity: 50,
            avg_service_minutes: None,
        };
        let instance = SlotInstance::from_template(&template, today());
        let slot_id = instance.id.clone();

        let registry = Arc::new(SlotRegistry::new());
        registry.register(instance).unwrap();
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let alerts = Arc::new(AlertManager::new(event_tx.clone()));
        let occupancy_log = Arc::new(OccupancyLog::new());
        let bookings = Arc::new(BookingManager::new(
            registry,
            Arc::clone(&alerts),
            Arc::clone(&occupancy_log),
            event_tx,
            2,
        ));

        let catalog = Arc::new(CatalogService::new());
        catalog.upsert(MenuItem {
            id: "item-thali".to_string(),
            name: "Veg Thali".to_string(),
            price: Decimal::from_f64(45.0).unwrap(),
            available: true,
            category: None,
        });

        let service = AnalyticsService::new(
            Arc::clone(&bookings),
            alerts,
            catalog,
            occupancy_log,
            None,
        );
        (service, bookings, slot_id)
    }

    fn book(bookings: &BookingManager, slot_id: &str, student: &str, qty: u32) -> String {
        bookings
            .create_booking(BookingRequest {
                student_id: student.to_string(),
                slot_instance_id: slot_id.to_string(),
                items: vec![BookingLine {
                    menu_item_id: "item-thali".to_string(),
                    quantity: qty,
                }],
            })
            .unwrap()
            .booking
            .id
    }

    #[test]
    fn test_range_invalid() {
        let (service, _bookings, _slot) = setup();
        let start = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert!(matches!(
            service.summary(start, end),
            Err(AnalyticsError::RangeInvalid(_))
        ));
    }

    #[test]
    fn test_counts_and_revenue() {
        let (service, bookings, slot_id) = setup();
        let first = book(&bookings, &slot_id, "stu-1", 1);
        book(&bookings, &slot_id, "stu-2", 2);
        let third = book(&bookings, &slot_id, "stu-3", 1);
        bookings.cancel(&third).unwrap();

        let called = bookings.call_next(&slot_id).unwrap();
        assert_eq!(called.id, first);
        bookings.mark_served(&first).unwrap();

        let summary = service.summary(today(), today()).unwrap();
        assert_eq!(summary.total_bookings, 3);
        assert_eq!(summary.served, 1);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.active_tokens, 1);
        // Cancelled booking excluded: 45 * 1 + 45 * 2
        assert_eq!(summary.revenue, Decimal::from_f64(135.0).unwrap());
    }

    #[test]
    fn test_per_slot_breakdown() {
        let (service, bookings, slot_id) = setup();
        book(&bookings, &slot_id, "stu-1", 1);
        book(&bookings, &slot_id, "stu-2", 1);

        let summary = service.summary(today(), today()).unwrap();
        assert_eq!(summary.per_slot.len(), 1);
        let breakdown = &summary.per_slot[0];
        assert_eq!(breakdown.slot_instance_id, slot_id);
        assert_eq!(breakdown.total, 2);
        assert_eq!(breakdown.pending, 2);
        assert_eq!(breakdown.served, 0);
    }

    #[test]
    fn test_peak_hours_from_samples() {
        let (service, bookings, slot_id) = setup();
        book(&bookings, &slot_id, "stu-1", 1);
        book(&bookings, &slot_id, "stu-2", 1);

        let summary = service.summary(today(), today()).unwrap();
        // Both admissions landed in the current hour
        assert_eq!(summary.peak_hours.len(), 1);
        let bucket = &summary.peak_hours[0];
        assert_eq!(bucket.samples, 2);
        assert_eq!(bucket.peak_occupancy_rate, 4); // 2/50
    }

    #[test]
    fn test_empty_range_is_zeroed() {
        let (service, _bookings, _slot) = setup();
        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let summary = service.summary(past, past).unwrap();
        assert_eq!(summary.total_bookings, 0);
        assert_eq!(summary.revenue, Decimal::ZERO);
        assert!(summary.per_slot.is_empty());
        assert!(summary.peak_hours.is_empty());
        assert!(summary.forecast.is_none());
    }
}

//! Analytics rollups and the demand forecast client

pub mod aggregator;
pub mod forecast;

pub use aggregator::{
    AlertCounts, AnalyticsError, AnalyticsResult, AnalyticsService, BookingSummary, HourBucket,
    OccupancyLog, OccupancySnapshot, SlotBreakdown,
};
pub use forecast::{ConfidenceBand, DailyForecast, ForecastClient};

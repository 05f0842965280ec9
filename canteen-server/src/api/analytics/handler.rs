//! Analytics API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::BookingSummary;
use crate::core::ServerState;
use shared::AppResult;

const DEFAULT_FORECAST_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub forecast_days: Option<u32>,
}

/// GET /api/analytics/summary - rollup over a date range
///
/// Defaults to today when the range is omitted. The forecast section
/// is attached only when the forecast service is configured and
/// reachable.
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<BookingSummary>> {
    let today = chrono::Utc::now().date_naive();
    let start = query.start.unwrap_or(today);
    let end = query.end.unwrap_or(today);
    let forecast_days = query.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS);

    let summary = state
        .analytics
        .summary_with_forecast(start, end, forecast_days)
        .await?;
    Ok(Json(summary))
}

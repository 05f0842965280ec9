//! Slot instance API handlers
//!
//! Slot instances are normally materialized from templates by an
//! external daily job; `register` is that job's entry point.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::booking::QueueStatus;
use crate::core::ServerState;
use crate::crowd::Occupancy;
use shared::models::{Booking, MealName, SlotInstance, SlotTemplate};
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterSlot {
    #[validate(length(min = 1, message = "template_id must not be empty"))]
    pub template_id: String,
    pub date: NaiveDate,
    pub name: MealName,
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: u32,
    pub avg_service_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SetActive {
    pub active: bool,
}

/// POST /api/slots - register a materialized slot instance
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterSlot>,
) -> AppResult<Json<SlotInstance>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let template = SlotTemplate {
        id: payload.template_id,
        name: payload.name,
        start_time: payload.start_time,
        end_time: payload.end_time,
        default_capacity: payload.capacity,
        avg_service_minutes: payload.avg_service_minutes,
    };
    let instance = SlotInstance::from_template(&template, payload.date);
    let snapshot = instance.clone();
    state.registry.register(instance)?;
    Ok(Json(snapshot))
}

/// GET /api/slots - all instances, optionally for one date
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SlotInstance>>> {
    let slots = match query.date {
        Some(date) => state.registry.list_for_date(date),
        None => state.registry.list(),
    };
    Ok(Json(slots))
}

/// GET /api/slots/{id} - current instance snapshot
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SlotInstance>> {
    let snapshot = state.registry.snapshot(&id)?;
    Ok(Json(snapshot))
}

/// GET /api/slots/{id}/queue - live queue view
pub async fn queue(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<QueueStatus>> {
    let status = state.bookings.queue_status(&id)?;
    Ok(Json(status))
}

/// GET /api/slots/{id}/occupancy - classified occupancy
pub async fn occupancy(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Occupancy>> {
    let occupancy = state.bookings.occupancy(&id)?;
    Ok(Json(occupancy))
}

/// POST /api/slots/{id}/call-next - dequeue for serving
pub async fn call_next(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.call_next(&id)?;
    Ok(Json(booking))
}

/// POST /api/slots/{id}/active - open or close for booking
pub async fn set_active(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SetActive>,
) -> AppResult<Json<SlotInstance>> {
    state.registry.set_active(&id, payload.active)?;
    let snapshot = state.registry.snapshot(&id)?;
    Ok(Json(snapshot))
}

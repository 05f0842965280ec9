//! Bookings API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::booking::{AdmissionReceipt, BookingRequest};
use crate::core::ServerState;
use shared::models::{Booking, BookingLine};
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBooking {
    #[validate(length(min = 1, message = "student_id must not be empty"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "slot_instance_id must not be empty"))]
    pub slot_instance_id: String,
    #[serde(default)]
    pub items: Vec<BookingLine>,
}

#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_wait_minutes: Option<u32>,
}

/// POST /api/bookings - admit a booking
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateBooking>,
) -> AppResult<Json<AdmissionReceipt>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.items.iter().any(|line| line.quantity == 0) {
        return Err(AppError::validation("item quantity must be at least 1"));
    }

    let receipt = state.bookings.create_booking(BookingRequest {
        student_id: payload.student_id,
        slot_instance_id: payload.slot_instance_id,
        items: payload.items,
    })?;
    Ok(Json(receipt))
}

/// GET /api/bookings/{id} - booking with live wait estimate
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookingView>> {
    let (booking, estimated_wait_minutes) = state.bookings.booking_with_wait(&id)?;
    Ok(Json(BookingView {
        booking,
        estimated_wait_minutes,
    }))
}

/// POST /api/bookings/{id}/cancel - cancel a pending booking
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.cancel(&id)?;
    Ok(Json(booking))
}

/// POST /api/bookings/{id}/served - complete a serving booking
pub async fn mark_served(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.mark_served(&id)?;
    Ok(Json(booking))
}

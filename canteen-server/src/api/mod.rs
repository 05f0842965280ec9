//! HTTP API routes
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`bookings`] - admission and booking lifecycle
//! - [`slots`] - slot instances, queue views, staff call-next
//! - [`alerts`] - overcrowding alert listing and resolution
//! - [`analytics`] - admin summaries
//! - [`menu`] - catalog seam (upsert/list)
//!
//! Auth is handled by an upstream gateway; handlers trust the caller's
//! identity.

pub mod alerts;
pub mod analytics;
pub mod bookings;
pub mod health;
pub mod menu;
pub mod slots;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router
pub fn app(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(bookings::router())
        .merge(slots::router())
        .merge(alerts::router())
        .merge(analytics::router())
        .merge(menu::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

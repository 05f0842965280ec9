//! Slot instance API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/slots", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::register).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/queue", get(handler::queue))
        .route("/{id}/occupancy", get(handler::occupancy))
        .route("/{id}/call-next", post(handler::call_next))
        .route("/{id}/active", post(handler::set_active))
}

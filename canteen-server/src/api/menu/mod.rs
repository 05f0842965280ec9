//! Menu catalog API module
//!
//! Thin seam for the external catalog: upsert and list only. Menu
//! management proper lives outside the engine.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu-items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).put(handler::upsert))
        .route("/{id}", get(handler::get_by_id))
}

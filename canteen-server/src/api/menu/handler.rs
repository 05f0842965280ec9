//! Menu catalog API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use shared::models::MenuItem;
use shared::{AppError, AppResult, ErrorCode};

/// PUT /api/menu-items - insert or replace an item
pub async fn upsert(
    State(state): State<ServerState>,
    Json(item): Json<MenuItem>,
) -> AppResult<Json<MenuItem>> {
    if item.id.is_empty() {
        return Err(AppError::validation("menu item id must not be empty"));
    }
    state.catalog.upsert(item.clone());
    Ok(Json(item))
}

/// GET /api/menu-items
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.catalog.list()))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    state
        .catalog
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, format!("Menu item {id} not found")))
}

//! Overcrowding alerts API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use shared::AppResult;
use shared::models::Alert;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by resolution state; omit for all
    pub resolved: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ResolvePayload {
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/alerts - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    Ok(Json(state.alerts.list(query.resolved)))
}

/// GET /api/alerts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Alert>> {
    let alert = state.alerts.get(&id)?;
    Ok(Json(alert))
}

/// POST /api/alerts/{id}/resolve - manual resolution, idempotent
pub async fn resolve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ResolvePayload>,
) -> AppResult<Json<Alert>> {
    let notes = payload.notes.unwrap_or_else(|| "Resolved by staff".to_string());
    let alert = state.alerts.resolve(&id, notes)?;
    Ok(Json(alert))
}

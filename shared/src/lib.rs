//! Shared types for the canteen booking platform
//!
//! Common types used by the booking engine server and its clients:
//! domain models, error types, response structures, and the event
//! payloads broadcast to the notification layer.

pub mod error;
pub mod event;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

// Error re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};

// Event re-exports
pub use event::CanteenEvent;

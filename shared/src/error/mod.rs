//! Unified error handling for the canteen platform
//!
//! - **codes**: numeric error code taxonomy shared with clients
//! - **types**: `AppError`, `ApiResponse` envelope, axum integration

pub mod codes;
pub mod types;

pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};

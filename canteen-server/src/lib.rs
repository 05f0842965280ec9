//! Canteen Server - cafeteria token-booking engine
//!
//! # Architecture Overview
//!
//! The engine admits bookings against capacity-limited meal slots,
//! serves a strict FIFO queue per slot, classifies live occupancy, and
//! raises overcrowding alerts:
//!
//! - **Booking** (`booking`): capacity ledger, FIFO queue, wait-time
//!   estimation, admission pipeline
//! - **Crowd** (`crowd`): occupancy classification and alert management
//! - **Analytics** (`analytics`): read-only rollups and the external
//!   forecast collaborator
//! - **Catalog** (`catalog`): menu price/availability lookup
//! - **HTTP API** (`api`): thin axum surface over the engine
//!
//! # Module Structure
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # Configuration, server state
//! ├── booking/       # Ledger, queue, manager, wait time
//! ├── crowd/         # Classifier, alert manager
//! ├── analytics/     # Aggregator, forecast client
//! ├── catalog.rs     # Menu item lookup
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging helpers
//! ```

pub mod analytics;
pub mod api;
pub mod booking;
pub mod catalog;
pub mod core;
pub mod crowd;
pub mod utils;

// Re-export public types
pub use booking::{AdmissionReceipt, BookingManager, BookingRequest};
pub use catalog::CatalogService;
pub use core::{Config, ServerState};
pub use crowd::{AlertManager, Occupancy, classify};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

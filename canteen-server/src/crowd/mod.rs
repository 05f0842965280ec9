//! Crowd monitoring
//!
//! - **classifier**: pure occupancy-rate classification (fixed thresholds)
//! - **alerts**: alert lifecycle, one unresolved alert per slot instance

pub mod alerts;
pub mod classifier;

pub use alerts::{AlertError, AlertManager, AlertResult, CRITICAL_THRESHOLD};
pub use classifier::{HIGH_THRESHOLD, MEDIUM_THRESHOLD, Occupancy, classify};

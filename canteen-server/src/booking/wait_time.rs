//! Wait-time estimation
//!
//! Deliberately a linear model: position times the configured average
//! service duration. Recomputed on every read, never stored, since
//! positions move constantly. Demand forecasting proper lives in the
//! external ML collaborator.

/// Estimated minutes until a booking at `queue_position` is served
pub fn estimate(queue_position: u32, avg_service_minutes: u32) -> u32 {
    queue_position * avg_service_minutes
}

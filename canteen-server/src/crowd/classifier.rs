//! Crowd level classification
//!
//! Fixed threshold contract, shared with every client:
//! rate < 40 -> low, 40 <= rate < 70 -> medium, rate >= 70 -> high.
//! Active bookings are pending + serving; served and cancelled are
//! excluded.

use serde::{Deserialize, Serialize};
use shared::models::CrowdLevel;

/// Occupancy rate where MEDIUM begins
pub const MEDIUM_THRESHOLD: u8 = 40;
/// Occupancy rate where HIGH begins (alerts are raised from here)
pub const HIGH_THRESHOLD: u8 = 70;

/// Classified occupancy for one slot instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Occupancy {
    pub level: CrowdLevel,
    /// Percent of capacity, rounded, clamped to [0, 100]
    pub rate: u8,
    pub active_bookings: u32,
    pub total_capacity: u32,
}

/// Classify live occupancy into a discrete crowd level
///
/// Pure function; rate = round(100 * active / capacity) clamped to
/// [0, 100]. A capacity of zero classifies as empty (rate 0).
pub fn classify(active_bookings: u32, total_capacity: u32) -> Occupancy {
    let rate = if total_capacity == 0 {
        0
    } else {
        let scaled = (active_bookings as u64 * 100 + total_capacity as u64 / 2)
            / total_capacity as u64;
        scaled.min(100) as u8
    };

    let level = if rate < MEDIUM_THRESHOLD {
        CrowdLevel::Low
    } else if rate < HIGH_THRESHOLD {
        CrowdLevel::Medium
    } else {
        CrowdLevel::High
    };

    Occupancy {
        level,
        rate,
        active_bookings,
        total_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(39, 100).level, CrowdLevel::Low);
        assert_eq!(classify(40, 100).level, CrowdLevel::Medium);
        assert_eq!(classify(69, 100).level, CrowdLevel::Medium);
        assert_eq!(classify(70, 100).level, CrowdLevel::High);
        assert_eq!(classify(0, 100).level, CrowdLevel::Low);
    }

    #[test]
    fn test_rate_rounding() {
        // 1/3 -> 33%, 2/3 -> 67%
        assert_eq!(classify(1, 3).rate, 33);
        assert_eq!(classify(2, 3).rate, 67);
        // 7/10 -> 70%
        assert_eq!(classify(7, 10).rate, 70);
    }

    #[test]
    fn test_rate_clamped() {
        assert_eq!(classify(150, 100).rate, 100);
        assert_eq!(classify(10, 10).rate, 100);
    }

    #[test]
    fn test_zero_capacity() {
        let occ = classify(0, 0);
        assert_eq!(occ.rate, 0);
        assert_eq!(occ.level, CrowdLevel::Low);
    }

    #[test]
    fn test_full_house_is_high() {
        let occ = classify(10, 10);
        assert_eq!(occ.rate, 100);
        assert_eq!(occ.level, CrowdLevel::High);
    }
}

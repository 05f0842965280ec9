//! Slot Template / Slot Instance Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meal window name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealName {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealName {
    /// Single-letter prefix used when formatting token numbers
    pub const fn token_prefix(&self) -> char {
        match self {
            MealName::Breakfast => 'B',
            MealName::Lunch => 'L',
            MealName::Snacks => 'S',
            MealName::Dinner => 'D',
        }
    }
}

impl fmt::Display for MealName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealName::Breakfast => write!(f, "Breakfast"),
            MealName::Lunch => write!(f, "Lunch"),
            MealName::Snacks => write!(f, "Snacks"),
            MealName::Dinner => write!(f, "Dinner"),
        }
    }
}

/// Recurring meal-window definition, created by admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotTemplate {
    /// Template reference (String ID)
    pub id: String,
    pub name: MealName,
    /// Window start, "HH:MM"
    pub start_time: String,
    /// Window end, "HH:MM"
    pub end_time: String,
    /// Capacity applied to new instances unless overridden
    pub default_capacity: u32,
    /// Average minutes to serve one booking (falls back to the global default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_service_minutes: Option<u32>,
}

/// One calendar day's materialization of a [`SlotTemplate`]
///
/// Name and window times are copied from the template for display
/// stability. `current_bookings` is mutated only by the capacity ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInstance {
    /// Instance reference (String ID)
    pub id: String,
    pub template_id: String,
    pub date: NaiveDate,
    pub name: MealName,
    pub start_time: String,
    pub end_time: String,
    /// Admin-overridable per instance, always >= 1
    pub capacity: u32,
    /// 0 <= current_bookings <= capacity
    pub current_bookings: u32,
    /// Whether the instance accepts new bookings
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_service_minutes: Option<u32>,
}

impl SlotInstance {
    /// Materialize an instance from a template for the given date
    pub fn from_template(template: &SlotTemplate, date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            template_id: template.id.clone(),
            date,
            name: template.name,
            start_time: template.start_time.clone(),
            end_time: template.end_time.clone(),
            capacity: template.default_capacity.max(1),
            current_bookings: 0,
            is_active: true,
            avg_service_minutes: template.avg_service_minutes,
        }
    }
}

/// Discrete crowd classification of an occupancy rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrowdLevel::Low => write!(f, "low"),
            CrowdLevel::Medium => write!(f, "medium"),
            CrowdLevel::High => write!(f, "high"),
        }
    }
}

//! Menu Item Model
//!
//! Menu management itself lives outside the engine; the engine only
//! needs an opaque price/availability lookup for revenue computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Menu item reference (String ID)
    pub id: String,
    pub name: String,
    /// Price in currency unit
    pub price: Decimal,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

//! Menu catalog lookup
//!
//! The engine treats menu management as an external concern; this
//! service only answers price/availability lookups for admission checks
//! and revenue rollups.

use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::models::MenuItem;

/// In-memory menu item registry
#[derive(Debug, Default)]
pub struct CatalogService {
    items: DashMap<String, MenuItem>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a menu item
    pub fn upsert(&self, item: MenuItem) {
        self.items.insert(item.id.clone(), item);
    }

    /// Get a menu item by id
    pub fn get(&self, menu_item_id: &str) -> Option<MenuItem> {
        self.items.get(menu_item_id).map(|item| item.clone())
    }

    /// Opaque price lookup
    ///
    /// Prices of already-booked items stay countable even if the item
    /// is later marked unavailable.
    pub fn price_of(&self, menu_item_id: &str) -> Option<Decimal> {
        self.items.get(menu_item_id).map(|item| item.price)
    }

    /// Whether an item is currently orderable
    pub fn is_available(&self, menu_item_id: &str) -> bool {
        self.items
            .get(menu_item_id)
            .map(|item| item.available)
            .unwrap_or(false)
    }

    /// All items
    pub fn list(&self) -> Vec<MenuItem> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn thali() -> MenuItem {
        MenuItem {
            id: "item-thali".to_string(),
            name: "Veg Thali".to_string(),
            price: Decimal::from_f64(45.0).unwrap(),
            available: true,
            category: Some("Main".to_string()),
        }
    }

    #[test]
    fn test_price_lookup() {
        let catalog = CatalogService::new();
        catalog.upsert(thali());
        assert_eq!(
            catalog.price_of("item-thali"),
            Some(Decimal::from_f64(45.0).unwrap())
        );
        assert_eq!(catalog.price_of("item-ghost"), None);
    }

    #[test]
    fn test_unavailable_item_keeps_price() {
        let catalog = CatalogService::new();
        let mut item = thali();
        item.available = false;
        catalog.upsert(item);
        assert!(!catalog.is_available("item-thali"));
        assert!(catalog.price_of("item-thali").is_some());
    }
}

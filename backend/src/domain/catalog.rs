//! Read-only snapshots of catalog data owned by other services.

use super::ids::{ItemId, StoreId};

/// Store fields the core needs when grouping lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub id: StoreId,
    pub name: String,
    /// Charged once per store per order or cart, in the smallest currency unit.
    pub delivery_fee: u64,
}

/// Catalog item joined with its owning store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: u64,
    pub stock: u32,
    pub store: StoreSnapshot,
}

impl CatalogItem {
    /// Whether `quantity` units can be taken from current stock.
    #[must_use]
    pub const fn has_stock_for(&self, quantity: u32) -> bool {
        quantity <= self.stock
    }
}

//! Stock ledger rules.
//!
//! Stock leaves an item when an order is committed and comes back when that
//! order is cancelled. Every adapter applies movements through the helpers
//! here so the "never negative" rule has one definition.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use super::catalog::CatalogItem;
use super::error::Error;
use super::ids::ItemId;

/// Units requested per item, combined across lines.
///
/// Iteration is in ascending item id order. Adapters lock or update rows in
/// that order so concurrent orders touching the same items cannot deadlock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDemand {
    per_item: BTreeMap<ItemId, u32>,
}

impl StockDemand {
    /// Combine lines, summing quantities of repeated items.
    ///
    /// # Errors
    /// A combined quantity above `u32::MAX` cannot be satisfied by any stock
    /// level and is reported as [`crate::domain::ErrorCode::NotEnoughStock`].
    pub fn from_lines<I>(lines: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (ItemId, NonZeroU32)>,
    {
        let mut per_item = BTreeMap::new();
        for (item_id, quantity) in lines {
            let total: &mut u32 = per_item.entry(item_id).or_default();
            *total = total
                .checked_add(quantity.get())
                .ok_or_else(Error::not_enough_stock)?;
        }
        Ok(Self { per_item })
    }

    /// Units requested for `item_id`; zero when absent.
    #[must_use]
    pub fn quantity_for(&self, item_id: &ItemId) -> u32 {
        self.per_item.get(item_id).copied().unwrap_or_default()
    }

    /// Check the combined demand for `item` against its current stock.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotEnoughStock`] when demand exceeds stock.
    pub fn ensure_available(&self, item: &CatalogItem) -> Result<(), Error> {
        if item.has_stock_for(self.quantity_for(&item.id)) {
            Ok(())
        } else {
            Err(Error::not_enough_stock())
        }
    }

    /// `(item, quantity)` pairs in ascending item order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.per_item.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_item.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_item.is_empty()
    }
}

/// Stock left after taking `quantity`, or `None` if that would go negative.
#[must_use]
pub const fn take(stock: u32, quantity: u32) -> Option<u32> {
    stock.checked_sub(quantity)
}

/// Stock after returning `quantity`, or `None` on overflow.
#[must_use]
pub const fn restore(stock: u32, quantity: u32) -> Option<u32> {
    stock.checked_add(quantity)
}

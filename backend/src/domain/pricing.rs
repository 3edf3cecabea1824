//! Grouping and pricing of item lines by owning store.
//!
//! The same engine prices the cart view, cart checkout, direct orders and
//! order retrieval, so every surface agrees on how totals are formed:
//!
//! - each store appears once, in order of first appearance;
//! - a store total starts at its delivery fee and accumulates
//!   `price × quantity` for each of its lines;
//! - the grand total is the sum of store totals.
//!
//! Arithmetic is checked. An overflow is reported instead of wrapping.

use std::collections::HashMap;

use super::catalog::CatalogItem;
use super::error::Error;
use super::ids::{ItemId, StoreId};

/// One priced line inside a store detail block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

/// Lines of one store with its delivery fee and running total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDetail {
    pub store_id: StoreId,
    pub store_name: String,
    pub delivery_fee: u64,
    pub store_total_price: u64,
    pub items: Vec<PricedLine>,
}

/// Store details plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PricedBreakdown {
    details: Vec<StoreDetail>,
    total_price: u64,
}

impl PricedBreakdown {
    /// Store details in order of first appearance.
    #[must_use]
    pub fn details(&self) -> &[StoreDetail] {
        &self.details
    }

    /// Sum of all store totals.
    #[must_use]
    pub const fn total_price(&self) -> u64 {
        self.total_price
    }

    /// True when no lines were priced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Split into details and grand total.
    #[must_use]
    pub fn into_parts(self) -> (Vec<StoreDetail>, u64) {
        (self.details, self.total_price)
    }
}

/// Totals exceeded the representable range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("price arithmetic overflowed while pricing item {item_id}")]
pub struct PricingOverflow {
    item_id: ItemId,
}

impl From<PricingOverflow> for Error {
    fn from(err: PricingOverflow) -> Self {
        Self::internal(err.to_string())
    }
}

/// Group `(item, quantity)` pairs by store and compute totals.
///
/// # Errors
/// Returns [`PricingOverflow`] if any subtotal or total overflows `u64`.
///
/// # Examples
/// ```
/// use marketplace::domain::{CatalogItem, ItemId, StoreId, StoreSnapshot};
/// use marketplace::domain::pricing::price_lines;
///
/// let store = StoreSnapshot { id: StoreId::random(), name: "Bakery".into(), delivery_fee: 3000 };
/// let bread = CatalogItem {
///     id: ItemId::random(),
///     name: "Bread".into(),
///     price: 5000,
///     stock: 10,
///     store,
/// };
/// let priced = price_lines([(&bread, 1)]).expect("no overflow");
/// assert_eq!(priced.total_price(), 8000);
/// ```
pub fn price_lines<'a, I>(lines: I) -> Result<PricedBreakdown, PricingOverflow>
where
    I: IntoIterator<Item = (&'a CatalogItem, u32)>,
{
    let mut details: Vec<StoreDetail> = Vec::new();
    let mut positions: HashMap<StoreId, usize> = HashMap::new();
    let mut total_price = 0_u64;

    for (item, quantity) in lines {
        let overflow = || PricingOverflow { item_id: item.id };
        let subtotal = item
            .price
            .checked_mul(u64::from(quantity))
            .ok_or_else(overflow)?;

        let position = match positions.get(&item.store.id) {
            Some(position) => *position,
            None => {
                total_price = total_price
                    .checked_add(item.store.delivery_fee)
                    .ok_or_else(overflow)?;
                details.push(StoreDetail {
                    store_id: item.store.id,
                    store_name: item.store.name.clone(),
                    delivery_fee: item.store.delivery_fee,
                    store_total_price: item.store.delivery_fee,
                    items: Vec::new(),
                });
                positions.insert(item.store.id, details.len() - 1);
                details.len() - 1
            }
        };
        let Some(detail) = details.get_mut(position) else {
            continue;
        };

        detail.store_total_price = detail
            .store_total_price
            .checked_add(subtotal)
            .ok_or_else(overflow)?;
        total_price = total_price.checked_add(subtotal).ok_or_else(overflow)?;
        detail.items.push(PricedLine {
            item_id: item.id,
            item_name: item.name.clone(),
            price: item.price,
            quantity,
            subtotal,
        });
    }

    Ok(PricedBreakdown {
        details,
        total_price,
    })
}

//! Checkout planning: validation and pricing that precede any mutation.
//!
//! Both direct orders and cart checkout reduce to an [`OrderDraft`]. Building
//! a draft reads nothing but the snapshots handed in, so every rejection
//! happens before the repository is asked to move stock or write rows.

use std::collections::HashMap;
use std::num::NonZeroU32;

use super::cart::CartEntry;
use super::catalog::CatalogItem;
use super::error::Error;
use super::ids::{ItemId, OrderId, UserId};
use super::order::OrderLine;
use super::pricing::{PricedBreakdown, price_lines};
use super::stock::StockDemand;

/// An `(item, quantity)` pair exactly as the client sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedLine {
    pub item_id: ItemId,
    pub quantity: i64,
}

/// Where the draft's lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// Explicit item list in the request body.
    Direct,
    /// The user's cart; committing the draft empties it.
    Cart,
}

/// A validated, priced order waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub source: OrderSource,
    /// One line per requested pair, in request order.
    pub lines: Vec<OrderLine>,
    pub demand: StockDemand,
    pub breakdown: PricedBreakdown,
}

impl OrderDraft {
    /// Grand total the order will be stored with.
    #[must_use]
    pub const fn total_price(&self) -> u64 {
        self.breakdown.total_price()
    }

    /// Whether committing must also clear the user's cart.
    #[must_use]
    pub const fn clears_cart(&self) -> bool {
        matches!(self.source, OrderSource::Cart)
    }
}

/// Validate and price a direct order.
///
/// `catalog` is the batch lookup result for the requested ids; the order of
/// its entries does not matter.
///
/// # Errors
/// In this order: empty request, unresolved item, then per pair (request
/// order) a quantity below one or above stock, then combined demand above
/// stock for repeated items.
pub fn plan_direct_order(
    user_id: UserId,
    requested: &[RequestedLine],
    catalog: &[CatalogItem],
) -> Result<OrderDraft, Error> {
    if requested.is_empty() {
        return Err(Error::empty_item_list());
    }

    let by_id: HashMap<ItemId, &CatalogItem> = catalog.iter().map(|item| (item.id, item)).collect();
    if requested
        .iter()
        .any(|line| !by_id.contains_key(&line.item_id))
    {
        return Err(Error::item_not_found());
    }

    let mut validated = Vec::with_capacity(requested.len());
    for line in requested {
        let item = by_id
            .get(&line.item_id)
            .copied()
            .ok_or_else(Error::item_not_found)?;
        if line.quantity < 1 {
            return Err(Error::invalid_field_format());
        }
        let quantity = u32::try_from(line.quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(Error::not_enough_stock)?;
        if !item.has_stock_for(quantity.get()) {
            return Err(Error::not_enough_stock());
        }
        validated.push((item, quantity));
    }

    build_draft(user_id, OrderSource::Direct, &validated)
}

/// Validate and price a checkout of the user's cart.
///
/// # Errors
/// Empty cart, or any line above its item's stock.
pub fn plan_cart_checkout(user_id: UserId, entries: &[CartEntry]) -> Result<OrderDraft, Error> {
    if entries.is_empty() {
        return Err(Error::empty_cart());
    }

    let validated: Vec<(&CatalogItem, NonZeroU32)> = entries
        .iter()
        .map(|entry| (&entry.item, entry.quantity))
        .collect();
    if validated
        .iter()
        .any(|(item, quantity)| !item.has_stock_for(quantity.get()))
    {
        return Err(Error::not_enough_stock());
    }

    build_draft(user_id, OrderSource::Cart, &validated)
}

fn build_draft(
    user_id: UserId,
    source: OrderSource,
    validated: &[(&CatalogItem, NonZeroU32)],
) -> Result<OrderDraft, Error> {
    let demand = StockDemand::from_lines(
        validated
            .iter()
            .map(|(item, quantity)| (item.id, *quantity)),
    )?;
    for (item, _) in validated {
        demand.ensure_available(item)?;
    }

    let breakdown = price_lines(
        validated
            .iter()
            .map(|(item, quantity)| (*item, quantity.get())),
    )?;
    let lines = validated
        .iter()
        .map(|(item, quantity)| OrderLine {
            item_id: item.id,
            quantity: *quantity,
        })
        .collect();

    Ok(OrderDraft {
        order_id: OrderId::random(),
        user_id,
        source,
        lines,
        demand,
        breakdown,
    })
}

//! Cart aggregate: one quantity per (user, item).

use std::num::NonZeroU32;

use super::catalog::CatalogItem;
use super::error::Error;
use super::ids::{ItemId, UserId};
use super::pricing::{PricedBreakdown, StoreDetail, price_lines};

/// Persisted cart line. A stored line always has a positive quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: NonZeroU32,
}

/// Effect of a requested cart quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartQuantity {
    /// Create the line or overwrite its quantity.
    Set(NonZeroU32),
    /// Delete the line if present.
    Remove,
}

impl CartQuantity {
    /// Interpret a client-supplied quantity.
    ///
    /// # Errors
    /// Negative quantities and values beyond `u32::MAX` are rejected with
    /// [`crate::domain::ErrorCode::InvalidCartField`].
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::CartQuantity;
    ///
    /// assert_eq!(CartQuantity::from_requested(0).expect("zero"), CartQuantity::Remove);
    /// assert!(CartQuantity::from_requested(-1).is_err());
    /// ```
    pub fn from_requested(quantity: i64) -> Result<Self, Error> {
        if quantity == 0 {
            return Ok(Self::Remove);
        }
        u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self::Set)
            .ok_or_else(Error::invalid_cart_field)
    }
}

/// A cart line joined with its catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub quantity: NonZeroU32,
    pub item: CatalogItem,
}

/// Priced view of a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    breakdown: PricedBreakdown,
}

impl CartView {
    /// Price the given entries.
    ///
    /// # Errors
    /// Returns an internal error if totals overflow.
    pub fn from_entries(entries: &[CartEntry]) -> Result<Self, Error> {
        let breakdown = price_lines(
            entries
                .iter()
                .map(|entry| (&entry.item, entry.quantity.get())),
        )?;
        Ok(Self { breakdown })
    }

    #[must_use]
    pub fn details(&self) -> &[StoreDetail] {
        self.breakdown.details()
    }

    #[must_use]
    pub const fn total_price(&self) -> u64 {
        self.breakdown.total_price()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }
}

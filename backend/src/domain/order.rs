//! Order aggregate and its status machine.
//!
//! ```text
//! ORDERED ──► CANCELED   (restores stock)
//!    │
//!    └─────► COMPLETE
//! ```
//!
//! Both targets are terminal. Orders are never deleted.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::CatalogItem;
use super::error::Error;
use super::ids::{ItemId, OrderId, UserId};
use super::pricing::{PricedBreakdown, StoreDetail, price_lines};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Ordered,
    Canceled,
    Complete,
}

impl OrderStatus {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ORDERED",
            Self::Canceled => "CANCELED",
            Self::Complete => "COMPLETE",
        }
    }

    /// True for statuses that admit no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ordered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for status text outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDERED" => Ok(Self::Ordered),
            "CANCELED" => Ok(Self::Canceled),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(UnknownOrderStatus(other.to_owned())),
        }
    }
}

/// Order header as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Grand total captured when the order was placed.
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
}

/// An accepted status change, ready for the repository to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub order_id: OrderId,
    pub target: OrderStatus,
}

impl StatusTransition {
    /// Whether applying the transition returns line quantities to stock.
    #[must_use]
    pub const fn restocks(&self) -> bool {
        matches!(self.target, OrderStatus::Canceled)
    }
}

impl Order {
    /// Reject callers other than the owner.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotYourOrder`] when `user_id` differs.
    pub fn ensure_owned_by(&self, user_id: &UserId) -> Result<(), Error> {
        if &self.user_id == user_id {
            Ok(())
        } else {
            Err(Error::not_your_order())
        }
    }

    /// Validate a requested status against the state machine.
    ///
    /// Terminal orders reject every request, including invalid targets.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::InvalidOrderStatus`] when already terminal;
    /// [`crate::domain::ErrorCode::InvalidFieldFormat`] when `target` is
    /// `ORDERED`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use marketplace::domain::{ErrorCode, Order, OrderId, OrderStatus, UserId};
    ///
    /// let order = Order {
    ///     id: OrderId::random(),
    ///     user_id: UserId::random(),
    ///     status: OrderStatus::Complete,
    ///     total_price: 8000,
    ///     created_at: Utc::now(),
    /// };
    /// let err = order.transition_to(OrderStatus::Canceled).expect_err("terminal");
    /// assert_eq!(err.code(), ErrorCode::InvalidOrderStatus);
    /// ```
    pub fn transition_to(&self, target: OrderStatus) -> Result<StatusTransition, Error> {
        if self.status.is_terminal() {
            return Err(Error::invalid_order_status());
        }
        if !target.is_terminal() {
            return Err(Error::invalid_field_format());
        }
        Ok(StatusTransition {
            order_id: self.id,
            target,
        })
    }
}

/// One stored order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: NonZeroU32,
}

/// An order line joined with the item's current catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    pub quantity: NonZeroU32,
    pub item: CatalogItem,
}

/// Order header plus its per-store breakdown.
///
/// `total_price` is the stored total; detail lines are priced from the
/// catalog data the view was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    order: Order,
    breakdown: PricedBreakdown,
}

impl OrderView {
    /// Pair an order with an already computed breakdown.
    #[must_use]
    pub const fn new(order: Order, breakdown: PricedBreakdown) -> Self {
        Self { order, breakdown }
    }

    /// Re-price stored lines against current catalog data.
    ///
    /// # Errors
    /// Returns an internal error if totals overflow.
    pub fn from_entries(order: Order, entries: &[OrderEntry]) -> Result<Self, Error> {
        let breakdown = price_lines(
            entries
                .iter()
                .map(|entry| (&entry.item, entry.quantity.get())),
        )?;
        Ok(Self::new(order, breakdown))
    }

    #[must_use]
    pub const fn order(&self) -> &Order {
        &self.order
    }

    #[must_use]
    pub fn details(&self) -> &[StoreDetail] {
        self.breakdown.details()
    }

    #[must_use]
    pub const fn total_price(&self) -> u64 {
        self.order.total_price
    }
}

/// Line-free summary used when listing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub total_price: u64,
    pub status: OrderStatus,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            total_price: order.total_price,
            status: order.status,
        }
    }
}

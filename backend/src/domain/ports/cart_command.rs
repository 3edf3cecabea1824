//! Driving ports for cart operations.

use async_trait::async_trait;

use crate::domain::{CartView, Error, ItemId, OrderView, UserId};

/// Set the quantity of one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertCartLineRequest {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Raw client quantity: positive sets, zero removes, negative is invalid.
    pub quantity: i64,
}

/// Cart mutations, including checkout into an order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartCommand: Send + Sync {
    /// Apply an upsert and return the recomputed cart.
    async fn upsert_line(&self, request: UpsertCartLineRequest) -> Result<CartView, Error>;

    /// Remove every line of the user's cart.
    async fn clear(&self, user_id: &UserId) -> Result<(), Error>;

    /// Turn the whole cart into an order and empty the cart.
    async fn checkout(&self, user_id: &UserId) -> Result<OrderView, Error>;
}

/// Read-only cart access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartQuery: Send + Sync {
    /// Priced view of the user's cart.
    async fn view(&self, user_id: &UserId) -> Result<CartView, Error>;
}

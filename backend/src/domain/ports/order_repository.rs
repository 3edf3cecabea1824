//! Driven port owning the order unit of work.
//!
//! The two stock-mutating operations, [`OrderRepository::place`] and
//! [`OrderRepository::apply_transition`], each run as a single unit of work
//! in the adapter: either every write lands or none does. Adapters re-check
//! stock and status inside that unit so a concurrent request that slipped in
//! after validation cannot overdraw stock or restore it twice.

use async_trait::async_trait;

use crate::domain::{Order, OrderDraft, OrderEntry, OrderId, StatusTransition, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// Stock fell below the requested quantity before the commit.
        InsufficientStock { item_id: String } =>
            "insufficient stock for item {item_id}",
        /// The order left `ORDERED` before the transition was applied.
        StatusConflict { order_id: String } =>
            "order {order_id} is no longer ORDERED",
        /// The order vanished between lookup and update.
        Missing { order_id: String } =>
            "order {order_id} does not exist",
    }
}

/// Order persistence plus the stock movements tied to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Commit a draft: take stock for its demand, store the order as
    /// `ORDERED` with its lines and, for cart drafts, clear the cart.
    async fn place(&self, draft: &OrderDraft) -> Result<Order, OrderRepositoryError>;

    /// Fetch an order header.
    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Lines of an order joined with the items' current catalog data.
    async fn entries_for(&self, order_id: &OrderId)
    -> Result<Vec<OrderEntry>, OrderRepositoryError>;

    /// Orders owned by the user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Move an `ORDERED` order to the transition's target, restoring stock
    /// when the target is `CANCELED`.
    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<Order, OrderRepositoryError>;
}

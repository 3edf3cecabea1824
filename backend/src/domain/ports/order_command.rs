//! Driving ports for order placement, status changes and retrieval.

use async_trait::async_trait;

use crate::domain::{
    Error, OrderId, OrderStatus, OrderSummary, OrderView, RequestedLine, UserId,
};

/// Place an order from an explicit item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub lines: Vec<RequestedLine>,
}

/// Request a status change on an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOrderStatusRequest {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Order mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Validate, price and commit a direct order.
    async fn create(&self, request: CreateOrderRequest) -> Result<OrderView, Error>;

    /// Cancel or complete an order owned by the caller.
    async fn update_status(&self, request: UpdateOrderStatusRequest) -> Result<OrderView, Error>;
}

/// Order reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// One order owned by the caller, re-priced from current catalog data.
    async fn get(&self, user_id: &UserId, order_id: &OrderId) -> Result<OrderView, Error>;

    /// Summaries of every order the caller owns.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<OrderSummary>, Error>;
}

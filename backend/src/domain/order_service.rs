//! Order domain service implementing the order driving ports.
//!
//! Placement is split in two: [`crate::domain::checkout`] validates and
//! prices against catalog snapshots, then the repository commits the draft as
//! one unit of work. Status changes follow the same shape.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::checkout::{OrderDraft, plan_direct_order};
use crate::domain::ports::{
    CatalogLookup, CatalogLookupError, CreateOrderRequest, OrderCommand, OrderQuery,
    OrderRepository, OrderRepositoryError, UpdateOrderStatusRequest,
};
use crate::domain::{Error, ItemId, Order, OrderId, OrderSummary, OrderView, UserId};

/// Order service backed by a catalog lookup and an order repository.
#[derive(Clone)]
pub struct OrderService<C, O> {
    catalog: Arc<C>,
    orders: Arc<O>,
}

impl<C, O> OrderService<C, O> {
    /// Create a new service with the given ports.
    pub const fn new(catalog: Arc<C>, orders: Arc<O>) -> Self {
        Self { catalog, orders }
    }
}

pub(crate) fn map_catalog_error(error: CatalogLookupError) -> Error {
    match error {
        CatalogLookupError::Connection { message } => {
            Error::service_unavailable(format!("catalog lookup unavailable: {message}"))
        }
        CatalogLookupError::Query { message } => {
            Error::internal(format!("catalog lookup error: {message}"))
        }
    }
}

pub(crate) fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderRepositoryError::InsufficientStock { .. } => Error::not_enough_stock(),
        OrderRepositoryError::StatusConflict { .. } => Error::invalid_order_status(),
        OrderRepositoryError::Missing { .. } => Error::order_not_found(),
    }
}

/// Commit a validated draft and pair the stored order with the draft's
/// breakdown.
pub(crate) async fn commit_draft<O>(orders: &O, draft: OrderDraft) -> Result<OrderView, Error>
where
    O: OrderRepository + ?Sized,
{
    let order = orders.place(&draft).await.map_err(map_order_error)?;
    info!(
        order_id = %order.id,
        user_id = %order.user_id,
        total_price = order.total_price,
        lines = draft.lines.len(),
        clears_cart = draft.clears_cart(),
        "order placed"
    );
    Ok(OrderView::new(order, draft.breakdown))
}

impl<C, O> OrderService<C, O>
where
    C: CatalogLookup,
    O: OrderRepository,
{
    async fn owned_order(&self, user_id: &UserId, order_id: &OrderId) -> Result<Order, Error> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(Error::order_not_found)?;
        order.ensure_owned_by(user_id)?;
        Ok(order)
    }

    async fn view_of(&self, order: Order) -> Result<OrderView, Error> {
        let entries = self
            .orders
            .entries_for(&order.id)
            .await
            .map_err(map_order_error)?;
        OrderView::from_entries(order, &entries)
    }
}

#[async_trait]
impl<C, O> OrderCommand for OrderService<C, O>
where
    C: CatalogLookup,
    O: OrderRepository,
{
    async fn create(&self, request: CreateOrderRequest) -> Result<OrderView, Error> {
        let mut seen = HashSet::new();
        let distinct: Vec<ItemId> = request
            .lines
            .iter()
            .map(|line| line.item_id)
            .filter(|id| seen.insert(*id))
            .collect();
        let catalog = if distinct.is_empty() {
            Vec::new()
        } else {
            self.catalog
                .find_items(&distinct)
                .await
                .map_err(map_catalog_error)?
        };

        let draft = plan_direct_order(request.user_id, &request.lines, &catalog)?;
        commit_draft(self.orders.as_ref(), draft).await
    }

    async fn update_status(&self, request: UpdateOrderStatusRequest) -> Result<OrderView, Error> {
        let order = self
            .owned_order(&request.user_id, &request.order_id)
            .await?;
        let transition = order.transition_to(request.status)?;
        let updated = self
            .orders
            .apply_transition(&transition)
            .await
            .map_err(map_order_error)?;
        info!(
            order_id = %updated.id,
            status = %updated.status,
            restocked = transition.restocks(),
            "order status changed"
        );
        self.view_of(updated).await
    }
}

#[async_trait]
impl<C, O> OrderQuery for OrderService<C, O>
where
    C: CatalogLookup,
    O: OrderRepository,
{
    async fn get(&self, user_id: &UserId, order_id: &OrderId) -> Result<OrderView, Error> {
        let order = self.owned_order(user_id, order_id).await?;
        self.view_of(order).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<OrderSummary>, Error> {
        let orders = self
            .orders
            .list_for_user(user_id)
            .await
            .map_err(map_order_error)?;
        Ok(orders.iter().map(OrderSummary::from).collect())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;

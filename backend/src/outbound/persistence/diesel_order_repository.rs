//! PostgreSQL-backed `OrderRepository`.
//!
//! `place` and `apply_transition` each run in one transaction. Stock is taken
//! with a guarded `UPDATE items SET stock = stock - q WHERE id = ? AND stock
//! >= q`, one item at a time in ascending id order so concurrent orders lock
//! rows in the same sequence. A guard that matches no row rolls the whole
//! order back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    ItemId, Order, OrderDraft, OrderEntry, OrderId, OrderStatus, StatusTransition, UserId,
};

use super::diesel_error_mapping::{diesel_failure, pool_failure};
use super::models::{
    ItemRow, NewOrderLineRow, NewOrderRow, OrderRow, StoreRow, catalog_item, db_price,
    db_quantity, line_quantity,
};
use super::pool::DbPool;
use super::schema::{cart_lines, items, order_lines, orders, stores};

/// Orders, their lines and the stock movements tied to them.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a unit of work: either the driver failed or a guard
/// refused the write.
#[derive(Debug)]
enum UnitOfWorkError {
    Diesel(diesel::result::Error),
    Rejected(OrderRepositoryError),
}

impl From<diesel::result::Error> for UnitOfWorkError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<UnitOfWorkError> for OrderRepositoryError {
    fn from(error: UnitOfWorkError) -> Self {
        match error {
            UnitOfWorkError::Diesel(error) => diesel_failure(error),
            UnitOfWorkError::Rejected(error) => error,
        }
    }
}

fn order_from_row(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    Order::try_from(row).map_err(OrderRepositoryError::query)
}

/// Per-item decrements in ascending id order. A quantity that does not fit
/// the stock column can never be satisfied.
fn stock_takes(draft: &OrderDraft) -> Result<Vec<(Uuid, i32)>, OrderRepositoryError> {
    draft
        .demand
        .iter()
        .map(|(item_id, quantity): (ItemId, u32)| {
            db_quantity(quantity)
                .map(|quantity| (*item_id.as_uuid(), quantity))
                .map_err(|_| OrderRepositoryError::insufficient_stock(item_id.to_string()))
        })
        .collect()
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn place(&self, draft: &OrderDraft) -> Result<Order, OrderRepositoryError> {
        let takes = stock_takes(draft)?;
        let new_order = NewOrderRow {
            id: *draft.order_id.as_uuid(),
            user_id: *draft.user_id.as_uuid(),
            status: OrderStatus::Ordered.as_str(),
            total_price: db_price(draft.total_price()).map_err(OrderRepositoryError::query)?,
        };
        let new_lines = draft
            .lines
            .iter()
            .map(|line| {
                db_quantity(line.quantity.get()).map(|quantity| NewOrderLineRow {
                    order_id: *draft.order_id.as_uuid(),
                    item_id: *line.item_id.as_uuid(),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(OrderRepositoryError::query)?;
        let checked_out: Option<Vec<Uuid>> = draft.clears_cart().then(|| {
            draft
                .lines
                .iter()
                .map(|line| *line.item_id.as_uuid())
                .collect()
        });
        let user_id = *draft.user_id.as_uuid();

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(pool_failure::<OrderRepositoryError>)?;
        let row = conn
            .transaction::<OrderRow, UnitOfWorkError, _>(|conn| {
                async move {
                    for (item_id, quantity) in takes {
                        let updated = diesel::update(
                            items::table
                                .filter(items::id.eq(item_id))
                                .filter(items::stock.ge(quantity)),
                        )
                        .set(items::stock.eq(items::stock - quantity))
                        .execute(conn)
                        .await?;
                        if updated == 0 {
                            return Err(UnitOfWorkError::Rejected(
                                OrderRepositoryError::insufficient_stock(item_id.to_string()),
                            ));
                        }
                    }

                    let row = diesel::insert_into(orders::table)
                        .values(&new_order)
                        .returning(OrderRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(order_lines::table)
                        .values(&new_lines)
                        .execute(conn)
                        .await?;
                    if let Some(item_ids) = checked_out {
                        diesel::delete(
                            cart_lines::table
                                .filter(cart_lines::user_id.eq(user_id))
                                .filter(cart_lines::item_id.eq_any(item_ids)),
                        )
                        .execute(conn)
                        .await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;

        debug!(order_id = %row.id, "order committed");
        order_from_row(row)
    }

    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(pool_failure::<OrderRepositoryError>)?;
        let row: Option<OrderRow> = orders::table
            .find(order_id.as_uuid())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_failure::<OrderRepositoryError>)?;
        row.map(order_from_row).transpose()
    }

    async fn entries_for(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<OrderEntry>, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(pool_failure::<OrderRepositoryError>)?;
        let rows: Vec<(i32, ItemRow, StoreRow)> = order_lines::table
            .inner_join(items::table.inner_join(stores::table))
            .filter(order_lines::order_id.eq(order_id.as_uuid()))
            .order_by(order_lines::id.asc())
            .select((
                order_lines::quantity,
                ItemRow::as_select(),
                StoreRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_failure::<OrderRepositoryError>)?;

        rows.into_iter()
            .map(|(quantity, item, store)| -> Result<OrderEntry, String> {
                Ok(OrderEntry {
                    quantity: line_quantity(quantity)?,
                    item: catalog_item(item, store)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(OrderRepositoryError::query)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(pool_failure::<OrderRepositoryError>)?;
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id.as_uuid()))
            .order_by((orders::created_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_failure::<OrderRepositoryError>)?;
        rows.into_iter().map(order_from_row).collect()
    }

    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<Order, OrderRepositoryError> {
        let order_id = *transition.order_id.as_uuid();
        let target = transition.target.as_str();
        let restocks = transition.restocks();

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(pool_failure::<OrderRepositoryError>)?;
        let row = conn
            .transaction::<OrderRow, UnitOfWorkError, _>(|conn| {
                async move {
                    let updated: Option<OrderRow> = diesel::update(
                        orders::table
                            .filter(orders::id.eq(order_id))
                            .filter(orders::status.eq(OrderStatus::Ordered.as_str())),
                    )
                    .set(orders::status.eq(target))
                    .returning(OrderRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(row) = updated else {
                        let exists: bool = diesel::select(diesel::dsl::exists(
                            orders::table.filter(orders::id.eq(order_id)),
                        ))
                        .get_result(conn)
                        .await?;
                        let rejection = if exists {
                            OrderRepositoryError::status_conflict(order_id.to_string())
                        } else {
                            OrderRepositoryError::missing(order_id.to_string())
                        };
                        return Err(UnitOfWorkError::Rejected(rejection));
                    };

                    if restocks {
                        let lines: Vec<(Uuid, i32)> = order_lines::table
                            .filter(order_lines::order_id.eq(order_id))
                            .order_by(order_lines::item_id.asc())
                            .select((order_lines::item_id, order_lines::quantity))
                            .load(conn)
                            .await?;
                        for (item_id, quantity) in lines {
                            diesel::update(items::table.filter(items::id.eq(item_id)))
                                .set(items::stock.eq(items::stock + quantity))
                                .execute(conn)
                                .await?;
                        }
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;

        debug!(order_id = %row.id, status = %row.status, "order status stored");
        order_from_row(row)
    }
}

//! PostgreSQL-backed `CartRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CartRepository, CartRepositoryError};
use crate::domain::{CartEntry, CartLine, ItemId, UserId};

use super::diesel_error_mapping::{diesel_failure, pool_failure};
use super::models::{ItemRow, NewCartLineRow, StoreRow, catalog_item, db_quantity, line_quantity};
use super::pool::DbPool;
use super::schema::{cart_lines, items, stores};

/// Cart lines keyed by `(user_id, item_id)`.
#[derive(Clone)]
pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for DieselCartRepository {
    async fn upsert_line(&self, line: &CartLine) -> Result<(), CartRepositoryError> {
        let row = NewCartLineRow {
            user_id: *line.user_id.as_uuid(),
            item_id: *line.item_id.as_uuid(),
            quantity: db_quantity(line.quantity.get()).map_err(CartRepositoryError::query)?,
        };
        let mut conn = self.pool.get().await.map_err(pool_failure)?;

        // Overwriting keeps `created_at`, so the line keeps its place.
        diesel::insert_into(cart_lines::table)
            .values(&row)
            .on_conflict((cart_lines::user_id, cart_lines::item_id))
            .do_update()
            .set(cart_lines::quantity.eq(excluded(cart_lines::quantity)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_failure)
    }

    async fn remove_line(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> Result<(), CartRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;
        diesel::delete(
            cart_lines::table
                .filter(cart_lines::user_id.eq(user_id.as_uuid()))
                .filter(cart_lines::item_id.eq(item_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_failure)
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<CartEntry>, CartRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;
        let rows: Vec<(i32, ItemRow, StoreRow)> = cart_lines::table
            .inner_join(items::table.inner_join(stores::table))
            .filter(cart_lines::user_id.eq(user_id.as_uuid()))
            .order_by((cart_lines::created_at.asc(), cart_lines::item_id.asc()))
            .select((
                cart_lines::quantity,
                ItemRow::as_select(),
                StoreRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_failure)?;

        rows.into_iter()
            .map(|(quantity, item, store)| -> Result<CartEntry, String> {
                Ok(CartEntry {
                    quantity: line_quantity(quantity)?,
                    item: catalog_item(item, store)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(CartRepositoryError::query)
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), CartRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_failure)?;
        diesel::delete(cart_lines::table.filter(cart_lines::user_id.eq(user_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_failure)
    }
}

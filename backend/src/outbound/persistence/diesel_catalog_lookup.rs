//! PostgreSQL-backed `CatalogLookup`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CatalogLookup, CatalogLookupError};
use crate::domain::{CatalogItem, ItemId};

use super::diesel_error_mapping::{diesel_failure, pool_failure};
use super::models::{ItemRow, StoreRow, catalog_item};
use super::pool::DbPool;
use super::schema::{items, stores};

/// Item lookup joined with the owning store in one query.
#[derive(Clone)]
pub struct DieselCatalogLookup {
    pool: DbPool,
}

impl DieselCatalogLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogLookup for DieselCatalogLookup {
    async fn find_items(&self, item_ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogLookupError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = item_ids.iter().map(|id| *id.as_uuid()).collect();
        let requested = ids.len();
        let mut conn = self.pool.get().await.map_err(pool_failure)?;

        let rows: Vec<(ItemRow, StoreRow)> = items::table
            .inner_join(stores::table)
            .filter(items::id.eq_any(ids))
            .select((ItemRow::as_select(), StoreRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(diesel_failure)?;
        debug!(requested, found = rows.len(), "catalog lookup");

        rows.into_iter()
            .map(|(item, store)| catalog_item(item, store))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CatalogLookupError::query)
    }
}

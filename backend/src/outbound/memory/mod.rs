//! In-process adapter for the catalog, cart and order ports.
//!
//! All tables sit behind one mutex, so every port call is a single critical
//! section: the stock checks and writes of `place` and `apply_transition`
//! observe and mutate a consistent snapshot, matching the transaction used by
//! the PostgreSQL adapters.
//!
//! Used when no database is configured and by integration tests.

mod seed;

pub use seed::{CatalogSeed, ItemSeed, SeedError, StoreSeed};

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{
    CartRepository, CartRepositoryError, CatalogLookup, CatalogLookupError, OrderRepository,
    OrderRepositoryError,
};
use crate::domain::stock::{restore, take};
use crate::domain::{
    CartEntry, CartLine, CatalogItem, ItemId, Order, OrderDraft, OrderEntry, OrderId, OrderLine,
    OrderStatus, StatusTransition, StoreId, StoreSnapshot, UserId,
};

#[derive(Debug, Clone)]
struct ItemRecord {
    name: String,
    price: u64,
    stock: u32,
    store_id: StoreId,
}

#[derive(Debug, Clone)]
struct StoredOrder {
    order: Order,
    lines: Vec<OrderLine>,
}

#[derive(Debug, Default)]
struct Tables {
    stores: HashMap<StoreId, StoreSnapshot>,
    items: HashMap<ItemId, ItemRecord>,
    // Insertion order is the "oldest line first" order of a cart.
    cart_lines: Vec<CartLine>,
    // Insertion order is creation order; listings walk it backwards.
    orders: Vec<StoredOrder>,
}

impl Tables {
    fn insert_item(&mut self, item: &CatalogItem) {
        self.stores.insert(item.store.id, item.store.clone());
        self.items.insert(
            item.id,
            ItemRecord {
                name: item.name.clone(),
                price: item.price,
                stock: item.stock,
                store_id: item.store.id,
            },
        );
    }

    fn catalog_item(&self, item_id: &ItemId) -> Option<CatalogItem> {
        let record = self.items.get(item_id)?;
        let store = self.stores.get(&record.store_id)?;
        Some(CatalogItem {
            id: *item_id,
            name: record.name.clone(),
            price: record.price,
            stock: record.stock,
            store: store.clone(),
        })
    }

    fn order_mut(&mut self, order_id: &OrderId) -> Option<&mut StoredOrder> {
        self.orders
            .iter_mut()
            .find(|stored| stored.order.id == *order_id)
    }
}

/// Catalog, carts and orders held in process memory.
///
/// # Examples
/// ```
/// use marketplace::domain::{CatalogItem, ItemId, StoreId, StoreSnapshot};
/// use marketplace::outbound::memory::InMemoryMarketplace;
///
/// let store = InMemoryMarketplace::default();
/// let item = CatalogItem {
///     id: ItemId::random(),
///     name: "Bread".to_owned(),
///     price: 5000,
///     stock: 3,
///     store: StoreSnapshot {
///         id: StoreId::random(),
///         name: "Bakery".to_owned(),
///         delivery_fee: 3000,
///     },
/// };
/// store.put_item(&item).expect("tables available");
/// assert_eq!(store.stock_of(&item.id), Some(3));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    tables: Mutex<Tables>,
}

impl InMemoryMarketplace {
    /// Build a store pre-populated from a catalog seed.
    #[must_use]
    pub fn from_seed(seed: &CatalogSeed) -> Self {
        let mut tables = Tables::default();
        for item in seed.catalog_items() {
            tables.insert_item(&item);
        }
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory tables poisoned".to_owned())
    }

    /// Insert or replace an item together with its owning store.
    ///
    /// # Errors
    /// Returns [`CatalogLookupError::Query`] when a previous holder of the
    /// tables panicked.
    pub fn put_item(&self, item: &CatalogItem) -> Result<(), CatalogLookupError> {
        self.lock()
            .map_err(CatalogLookupError::query)?
            .insert_item(item);
        Ok(())
    }

    /// Current stock of an item, if it exists.
    #[must_use]
    pub fn stock_of(&self, item_id: &ItemId) -> Option<u32> {
        self.lock()
            .ok()
            .and_then(|tables| tables.items.get(item_id).map(|record| record.stock))
    }

    /// Number of orders stored for every user.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().map(|tables| tables.orders.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CatalogLookup for InMemoryMarketplace {
    async fn find_items(&self, item_ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogLookupError> {
        let tables = self.lock().map_err(CatalogLookupError::query)?;
        let mut found: Vec<CatalogItem> = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            if found.iter().any(|item| item.id == *item_id) {
                continue;
            }
            if let Some(item) = tables.catalog_item(item_id) {
                found.push(item);
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl CartRepository for InMemoryMarketplace {
    async fn upsert_line(&self, line: &CartLine) -> Result<(), CartRepositoryError> {
        let mut tables = self.lock().map_err(CartRepositoryError::query)?;
        match tables
            .cart_lines
            .iter_mut()
            .find(|stored| stored.user_id == line.user_id && stored.item_id == line.item_id)
        {
            Some(stored) => stored.quantity = line.quantity,
            None => tables.cart_lines.push(*line),
        }
        Ok(())
    }

    async fn remove_line(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> Result<(), CartRepositoryError> {
        let mut tables = self.lock().map_err(CartRepositoryError::query)?;
        tables
            .cart_lines
            .retain(|line| !(line.user_id == *user_id && line.item_id == *item_id));
        Ok(())
    }

    async fn entries_for(&self, user_id: &UserId) -> Result<Vec<CartEntry>, CartRepositoryError> {
        let tables = self.lock().map_err(CartRepositoryError::query)?;
        Ok(tables
            .cart_lines
            .iter()
            .filter(|line| line.user_id == *user_id)
            .filter_map(|line| {
                tables.catalog_item(&line.item_id).map(|item| CartEntry {
                    quantity: line.quantity,
                    item,
                })
            })
            .collect())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), CartRepositoryError> {
        let mut tables = self.lock().map_err(CartRepositoryError::query)?;
        tables.cart_lines.retain(|line| line.user_id != *user_id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryMarketplace {
    async fn place(&self, draft: &OrderDraft) -> Result<Order, OrderRepositoryError> {
        let mut tables = self.lock().map_err(OrderRepositoryError::query)?;

        // Check every item before touching any stock.
        let remaining = draft
            .demand
            .iter()
            .map(|(item_id, quantity)| {
                tables
                    .items
                    .get(&item_id)
                    .and_then(|record| take(record.stock, quantity))
                    .map(|left| (item_id, left))
                    .ok_or_else(|| OrderRepositoryError::insufficient_stock(item_id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (item_id, left) in remaining {
            if let Some(record) = tables.items.get_mut(&item_id) {
                record.stock = left;
            }
        }

        let order = Order {
            id: draft.order_id,
            user_id: draft.user_id,
            status: OrderStatus::Ordered,
            total_price: draft.total_price(),
            created_at: Utc::now(),
        };
        tables.orders.push(StoredOrder {
            order: order.clone(),
            lines: draft.lines.clone(),
        });
        if draft.clears_cart() {
            tables.cart_lines.retain(|line| {
                line.user_id != draft.user_id
                    || !draft.lines.iter().any(|ordered| ordered.item_id == line.item_id)
            });
        }
        debug!(order_id = %order.id, "order stored in memory");
        Ok(order)
    }

    async fn find_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let tables = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(tables
            .orders
            .iter()
            .find(|stored| stored.order.id == *order_id)
            .map(|stored| stored.order.clone()))
    }

    async fn entries_for(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<OrderEntry>, OrderRepositoryError> {
        let tables = self.lock().map_err(OrderRepositoryError::query)?;
        let Some(stored) = tables
            .orders
            .iter()
            .find(|stored| stored.order.id == *order_id)
        else {
            return Ok(Vec::new());
        };
        Ok(stored
            .lines
            .iter()
            .filter_map(|line| {
                tables.catalog_item(&line.item_id).map(|item| OrderEntry {
                    quantity: line.quantity,
                    item,
                })
            })
            .collect())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let tables = self.lock().map_err(OrderRepositoryError::query)?;
        Ok(tables
            .orders
            .iter()
            .rev()
            .filter(|stored| stored.order.user_id == *user_id)
            .map(|stored| stored.order.clone())
            .collect())
    }

    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<Order, OrderRepositoryError> {
        let mut tables = self.lock().map_err(OrderRepositoryError::query)?;
        let order_id = transition.order_id;
        let stored = tables
            .order_mut(&order_id)
            .ok_or_else(|| OrderRepositoryError::missing(order_id.to_string()))?;
        if stored.order.status != OrderStatus::Ordered {
            return Err(OrderRepositoryError::status_conflict(order_id.to_string()));
        }
        let lines = stored.lines.clone();

        if transition.restocks() {
            let restored = restored_stock(&tables, &lines)?;
            for (item_id, stock) in restored {
                if let Some(record) = tables.items.get_mut(&item_id) {
                    record.stock = stock;
                }
            }
        }

        let stored = tables
            .order_mut(&order_id)
            .ok_or_else(|| OrderRepositoryError::missing(order_id.to_string()))?;
        stored.order.status = transition.target;
        Ok(stored.order.clone())
    }
}

fn restored_stock(
    tables: &Tables,
    lines: &[OrderLine],
) -> Result<Vec<(ItemId, u32)>, OrderRepositoryError> {
    let mut restored: HashMap<ItemId, u32> = HashMap::new();
    for line in lines {
        let Some(record) = tables.items.get(&line.item_id) else {
            continue;
        };
        let current = restored.get(&line.item_id).copied().unwrap_or(record.stock);
        let next = restore(current, NonZeroU32::get(line.quantity)).ok_or_else(|| {
            OrderRepositoryError::query(format!("stock overflow restoring {}", line.item_id))
        })?;
        restored.insert(line.item_id, next);
    }
    Ok(restored.into_iter().collect())
}

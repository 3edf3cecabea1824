//! Internal Diesel row structs and their conversion into domain snapshots.
//!
//! Rows never leave the persistence layer. Integer columns are signed in
//! PostgreSQL; conversions reject negative values instead of wrapping.

use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CatalogItem, ItemId, Order, OrderId, OrderStatus, StoreId, StoreSnapshot, UserId,
};

use super::schema::{cart_lines, items, order_lines, orders, stores};

/// Row read from `stores`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StoreRow {
    pub id: Uuid,
    pub name: String,
    pub delivery_fee: i64,
}

/// Row read from `items`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cart_lines)]
pub(crate) struct NewCartLineRow {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Row read from `orders`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: &'a str,
    pub total_price: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_lines)]
pub(crate) struct NewOrderLineRow {
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

fn unsigned<T, S>(value: S, column: &str) -> Result<T, String>
where
    T: TryFrom<S>,
    S: Copy + std::fmt::Display,
{
    T::try_from(value).map_err(|_| format!("{column} out of range: {value}"))
}

/// Join an item row with its store row.
pub(crate) fn catalog_item(item: ItemRow, store: StoreRow) -> Result<CatalogItem, String> {
    Ok(CatalogItem {
        id: ItemId::from_uuid(item.id),
        name: item.name,
        price: unsigned(item.price, "items.price")?,
        stock: unsigned(item.stock, "items.stock")?,
        store: StoreSnapshot {
            id: StoreId::from_uuid(store.id),
            name: store.name,
            delivery_fee: unsigned(store.delivery_fee, "stores.delivery_fee")?,
        },
    })
}

/// Stored line quantity; the column is constrained to be positive.
pub(crate) fn line_quantity(quantity: i32) -> Result<NonZeroU32, String> {
    u32::try_from(quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| format!("line quantity out of range: {quantity}"))
}

/// Quantity as written to an `INTEGER` column.
pub(crate) fn db_quantity(quantity: u32) -> Result<i32, String> {
    i32::try_from(quantity).map_err(|_| format!("quantity exceeds column range: {quantity}"))
}

/// Price as written to a `BIGINT` column.
pub(crate) fn db_price(price: u64) -> Result<i64, String> {
    i64::try_from(price).map_err(|_| format!("price exceeds column range: {price}"))
}

impl TryFrom<OrderRow> for Order {
    type Error = String;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            status: OrderStatus::from_str(&row.status).map_err(|err| err.to_string())?,
            total_price: unsigned(row.total_price, "orders.total_price")?,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn store_row() -> StoreRow {
        StoreRow {
            id: Uuid::new_v4(),
            name: "Bakery".to_owned(),
            delivery_fee: 3000,
        }
    }

    #[rstest]
    fn joins_item_and_store_rows() {
        let item = ItemRow {
            id: Uuid::new_v4(),
            name: "Bread".to_owned(),
            price: 5000,
            stock: 7,
        };

        let joined = catalog_item(item.clone(), store_row()).expect("valid rows");

        assert_eq!(joined.id.as_uuid(), &item.id);
        assert_eq!(joined.stock, 7);
        assert_eq!(joined.store.delivery_fee, 3000);
    }

    #[rstest]
    fn negative_stock_is_rejected() {
        let item = ItemRow {
            id: Uuid::new_v4(),
            name: "Bread".to_owned(),
            price: 5000,
            stock: -1,
        };

        let err = catalog_item(item, store_row()).expect_err("negative");
        assert!(err.contains("items.stock"));
    }

    #[rstest]
    #[case("ORDERED", OrderStatus::Ordered)]
    #[case("CANCELED", OrderStatus::Canceled)]
    #[case("COMPLETE", OrderStatus::Complete)]
    fn order_rows_parse_status(#[case] stored: &str, #[case] expected: OrderStatus) {
        let row = OrderRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: stored.to_owned(),
            total_price: 13_000,
            created_at: Utc::now(),
        };

        let order = Order::try_from(row).expect("valid row");
        assert_eq!(order.status, expected);
        assert_eq!(order.total_price, 13_000);
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let row = OrderRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: "SHIPPED".to_owned(),
            total_price: 0,
            created_at: Utc::now(),
        };

        assert!(Order::try_from(row).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_line_quantities_are_rejected(#[case] stored: i32) {
        assert!(line_quantity(stored).is_err());
    }

    #[rstest]
    fn oversized_quantities_do_not_fit_the_column() {
        assert!(db_quantity(u32::MAX).is_err());
        assert_eq!(db_quantity(12), Ok(12));
    }
}

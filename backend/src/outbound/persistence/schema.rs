//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the SQL; `diesel print-schema` against a migrated
//! database regenerates the table blocks.

diesel::table! {
    /// Sellers. The delivery fee is charged once per store per order.
    stores (id) {
        id -> Uuid,
        name -> Varchar,
        delivery_fee -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalog items. `stock` is guarded by `CHECK (stock >= 0)`.
    items (id) {
        id -> Uuid,
        store_id -> Uuid,
        name -> Varchar,
        price -> Int8,
        stock -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (user, item) with a positive quantity.
    cart_lines (user_id, item_id) {
        user_id -> Uuid,
        item_id -> Uuid,
        quantity -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order headers. `status` is one of `ORDERED`, `CANCELED`, `COMPLETE`.
    orders (id) {
        id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        total_price -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable order lines in request order.
    order_lines (id) {
        id -> Int8,
        order_id -> Uuid,
        item_id -> Uuid,
        quantity -> Int4,
    }
}

diesel::joinable!(items -> stores (store_id));
diesel::joinable!(cart_lines -> items (item_id));
diesel::joinable!(order_lines -> orders (order_id));
diesel::joinable!(order_lines -> items (item_id));

diesel::allow_tables_to_appear_in_same_query!(stores, items, cart_lines, orders, order_lines);

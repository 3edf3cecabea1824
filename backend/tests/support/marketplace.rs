//! In-memory marketplace wired through the real services.
//!
//! Integration tests compile as separate crates, so each test binary includes
//! this file with `#[path]` and uses the parts it needs.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use marketplace::domain::ports::{CartCommand, CartQuery, OrderCommand, OrderQuery};
use marketplace::domain::{
    CartService, CatalogItem, ItemId, OrderService, StoreId, StoreSnapshot, UserId,
};
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::memory::InMemoryMarketplace;
use marketplace::outbound::token::JwtAccessTokens;

pub const TOKEN_SECRET: &[u8] = b"integration-test-secret";

type Carts = CartService<InMemoryMarketplace, InMemoryMarketplace, InMemoryMarketplace>;
type Orders = OrderService<InMemoryMarketplace, InMemoryMarketplace>;

/// Store, services and token issuer sharing one set of tables.
pub struct Marketplace {
    pub store: Arc<InMemoryMarketplace>,
    pub tokens: Arc<JwtAccessTokens>,
    pub carts: Arc<Carts>,
    pub orders: Arc<Orders>,
}

impl Default for Marketplace {
    fn default() -> Self {
        let store = Arc::new(InMemoryMarketplace::default());
        let carts = Arc::new(CartService::new(store.clone(), store.clone(), store.clone()));
        let orders = Arc::new(OrderService::new(store.clone(), store.clone()));
        Self {
            store,
            tokens: Arc::new(JwtAccessTokens::new(TOKEN_SECRET)),
            carts,
            orders,
        }
    }
}

impl Marketplace {
    /// Register a store with `delivery_fee`.
    pub fn open_store(name: &str, delivery_fee: u64) -> StoreSnapshot {
        StoreSnapshot {
            id: StoreId::random(),
            name: name.to_owned(),
            delivery_fee,
        }
    }

    /// Add an item sold by `store`.
    pub fn stock_item(
        &self,
        store: &StoreSnapshot,
        name: &str,
        price: u64,
        stock: u32,
    ) -> CatalogItem {
        let item = CatalogItem {
            id: ItemId::random(),
            name: name.to_owned(),
            price,
            stock,
            store: store.clone(),
        };
        self.store.put_item(&item).expect("item should be stored");
        item
    }

    /// Remaining stock of `item_id`.
    pub fn stock_of(&self, item_id: &ItemId) -> u32 {
        self.store.stock_of(item_id).expect("item should exist")
    }

    /// Signed access token for `user_id`.
    pub fn token_for(&self, user_id: &UserId) -> String {
        self.tokens
            .issue(user_id, Duration::minutes(5))
            .expect("token should sign")
    }

    /// Handler state over the shared services.
    pub fn http_state(&self) -> web::Data<HttpState> {
        let carts: Arc<dyn CartCommand> = self.carts.clone();
        let carts_query: Arc<dyn CartQuery> = self.carts.clone();
        let orders: Arc<dyn OrderCommand> = self.orders.clone();
        let orders_query: Arc<dyn OrderQuery> = self.orders.clone();
        web::Data::new(HttpState::new(HttpStatePorts {
            carts,
            carts_query,
            orders,
            orders_query,
            tokens: self.tokens.clone(),
        }))
    }
}

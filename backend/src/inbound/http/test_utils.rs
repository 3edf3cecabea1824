//! Test helpers for inbound HTTP components.

use std::num::NonZeroU32;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use chrono::Utc;

use crate::domain::ports::{
    AccessTokenError, MockAccessTokenVerifier, MockCartCommand, MockCartQuery, MockOrderCommand,
    MockOrderQuery,
};
use crate::domain::{
    CartEntry, CartView, CatalogItem, ItemId, Order, OrderEntry, OrderId, OrderStatus, OrderView,
    StoreId, StoreSnapshot, UserId,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::validation::json_config;

/// Token accepted by [`accepting_verifier`].
pub const TEST_TOKEN: &str = "test-token";

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// Verifier resolving [`TEST_TOKEN`] to `user_id` and refusing anything else.
pub fn accepting_verifier(user_id: UserId) -> MockAccessTokenVerifier {
    let mut tokens = MockAccessTokenVerifier::new();
    tokens.expect_verify().returning(move |token| {
        if token == TEST_TOKEN {
            Ok(user_id)
        } else {
            Err(AccessTokenError::invalid("unknown test token"))
        }
    });
    tokens
}

/// Driving-port mocks for one handler test.
#[derive(Default)]
pub struct PortMocks {
    pub carts: MockCartCommand,
    pub carts_query: MockCartQuery,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
}

impl PortMocks {
    /// Wrap the mocks into handler state authenticating `user_id`.
    pub fn into_state(self, user_id: UserId) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            carts: Arc::new(self.carts),
            carts_query: Arc::new(self.carts_query),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
            tokens: Arc::new(accepting_verifier(user_id)),
        }))
    }
}

/// App skeleton with the API scope configuration handlers expect.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).app_data(json_config())
}

/// Catalog item of a fresh store with the given price and fee.
pub fn catalog_item(name: &str, price: u64, delivery_fee: u64) -> CatalogItem {
    CatalogItem {
        id: ItemId::random(),
        name: name.to_owned(),
        price,
        stock: 10,
        store: StoreSnapshot {
            id: StoreId::random(),
            name: format!("{name} store"),
            delivery_fee,
        },
    }
}

fn quantity(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero quantity")
}

/// Cart view with one line.
pub fn cart_view_of(item: &CatalogItem, qty: u32) -> CartView {
    CartView::from_entries(&[CartEntry {
        quantity: quantity(qty),
        item: item.clone(),
    }])
    .expect("priced cart")
}

/// Order view with one line in `status`.
pub fn order_view_of(
    user_id: UserId,
    item: &CatalogItem,
    qty: u32,
    status: OrderStatus,
) -> OrderView {
    let total_price = item.store.delivery_fee + item.price * u64::from(qty);
    let order = Order {
        id: OrderId::random(),
        user_id,
        status,
        total_price,
        created_at: Utc::now(),
    };
    OrderView::from_entries(
        order,
        &[OrderEntry {
            quantity: quantity(qty),
            item: item.clone(),
        }],
    )
    .expect("priced order")
}

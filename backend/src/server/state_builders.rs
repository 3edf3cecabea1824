//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use marketplace::domain::ports::{
    AccessTokenVerifier, CartRepository, CatalogLookup, OrderRepository,
};
use marketplace::domain::{CartService, OrderService};
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::memory::InMemoryMarketplace;
use marketplace::outbound::persistence::{
    DieselCartRepository, DieselCatalogLookup, DieselOrderRepository,
};
use marketplace::outbound::token::JwtAccessTokens;

use super::ServerConfig;

/// Share one set of repositories between the cart and order services.
fn service_ports<C, R, O>(
    catalog: Arc<C>,
    carts: Arc<R>,
    orders: Arc<O>,
    tokens: Arc<dyn AccessTokenVerifier>,
) -> HttpStatePorts
where
    C: CatalogLookup + 'static,
    R: CartRepository + 'static,
    O: OrderRepository + 'static,
{
    let cart_service = Arc::new(CartService::new(catalog.clone(), carts, orders.clone()));
    let order_service = Arc::new(OrderService::new(catalog, orders));
    HttpStatePorts {
        carts: cart_service.clone(),
        carts_query: cart_service,
        orders: order_service.clone(),
        orders_query: order_service,
        tokens,
    }
}

/// Build handler state from the configured storage backend.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let tokens: Arc<dyn AccessTokenVerifier> =
        Arc::new(JwtAccessTokens::new(config.token_secret.as_slice()));

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            service_ports(
                Arc::new(DieselCatalogLookup::new(pool.clone())),
                Arc::new(DieselCartRepository::new(pool.clone())),
                Arc::new(DieselOrderRepository::new(pool.clone())),
                tokens,
            )
        }
        None => {
            let store = Arc::new(match &config.catalog_seed {
                Some(seed) => InMemoryMarketplace::from_seed(seed),
                None => InMemoryMarketplace::default(),
            });
            info!("using in-memory repositories");
            service_ports(store.clone(), store.clone(), store, tokens)
        }
    };
    web::Data::new(HttpState::new(ports))
}

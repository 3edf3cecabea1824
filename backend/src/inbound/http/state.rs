//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, CartCommand, CartQuery, OrderCommand, OrderQuery,
};

/// Parameter object bundling the port implementations handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub carts: Arc<dyn CartCommand>,
    pub carts_query: Arc<dyn CartQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub carts: Arc<dyn CartCommand>,
    pub carts_query: Arc<dyn CartQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
}

impl HttpState {
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            carts,
            carts_query,
            orders,
            orders_query,
            tokens,
        } = ports;
        Self {
            carts,
            carts_query,
            orders,
            orders_query,
            tokens,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

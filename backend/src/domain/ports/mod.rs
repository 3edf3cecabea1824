//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CatalogLookup`, `CartRepository`, `OrderRepository`,
//! `AccessTokenVerifier`) expose typed errors that services translate into
//! domain errors. Driving ports (`CartCommand`, `CartQuery`, `OrderCommand`,
//! `OrderQuery`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_verifier;
mod cart_command;
mod cart_repository;
mod catalog_lookup;
mod order_command;
mod order_repository;

#[cfg(test)]
pub use access_token_verifier::MockAccessTokenVerifier;
pub use access_token_verifier::{AccessTokenError, AccessTokenVerifier};
#[cfg(test)]
pub use cart_command::{MockCartCommand, MockCartQuery};
pub use cart_command::{CartCommand, CartQuery, UpsertCartLineRequest};
#[cfg(test)]
pub use cart_repository::MockCartRepository;
pub use cart_repository::{CartRepository, CartRepositoryError};
#[cfg(test)]
pub use catalog_lookup::MockCatalogLookup;
pub use catalog_lookup::{CatalogLookup, CatalogLookupError};
#[cfg(test)]
pub use order_command::{MockOrderCommand, MockOrderQuery};
pub use order_command::{CreateOrderRequest, OrderCommand, OrderQuery, UpdateOrderStatusRequest};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};

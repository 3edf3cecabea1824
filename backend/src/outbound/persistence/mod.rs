//! PostgreSQL adapters built on Diesel, `diesel-async` and bb8.
//!
//! Adapters translate rows into domain snapshots and nothing more. Row
//! structs (`models`) and table definitions (`schema`) stay private to this
//! module.
//!
//! ```ignore
//! use marketplace::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! ```

mod diesel_cart_repository;
mod diesel_catalog_lookup;
mod diesel_error_mapping;
mod diesel_order_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_cart_repository::DieselCartRepository;
pub use diesel_catalog_lookup::DieselCatalogLookup;
pub use diesel_order_repository::DieselOrderRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

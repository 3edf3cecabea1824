//! Domain primitives, aggregates and services for the marketplace core.
//!
//! Purpose: keep cart, order and stock rules free of transport and storage
//! concerns. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: domain failure with its stable wire code.
//! - Identifiers: `UserId`, `ItemId`, `StoreId`, `OrderId`.
//! - Catalog snapshots, cart lines and views, orders and their views.
//! - `CartService` and `OrderService` implementing the driving ports.

pub mod cart;
mod cart_service;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod order;
mod order_service;
pub mod ports;
pub mod pricing;
pub mod stock;
pub mod trace_id;

pub use self::cart::{CartEntry, CartLine, CartQuantity, CartView};
pub use self::cart_service::CartService;
pub use self::catalog::{CatalogItem, StoreSnapshot};
pub use self::checkout::{OrderDraft, OrderSource, RequestedLine};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{InvalidIdentifier, ItemId, OrderId, StoreId, UserId};
pub use self::order::{
    Order, OrderEntry, OrderLine, OrderStatus, OrderSummary, OrderView, StatusTransition,
    UnknownOrderStatus,
};
pub use self::order_service::OrderService;
pub use self::pricing::{PricedBreakdown, PricedLine, StoreDetail};
pub use self::stock::StockDemand;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

//! Order, cart and stock core of a multi-tenant marketplace.
//!
//! Layout follows ports and adapters: [`domain`] holds the rules,
//! [`inbound`] exposes them over HTTP and [`outbound`] backs them with
//! PostgreSQL or process memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

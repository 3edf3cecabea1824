//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod carts;
pub mod error;
pub mod health;
pub mod orders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every marketplace route under `/api`, with trailing slashes trimmed.
///
/// Expects `web::Data<HttpState>` on the app.
#[must_use]
pub fn api_scope() -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/api")
        .wrap(NormalizePath::trim())
        .app_data(validation::json_config())
        .service(carts::upsert_cart_line)
        .service(carts::view_cart)
        .service(carts::clear_cart)
        .service(carts::checkout_cart)
        .service(orders::create_order)
        .service(orders::get_order)
        .service(orders::update_order_status)
        .service(orders::list_my_orders)
}

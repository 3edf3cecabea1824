//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` endpoint, the health probes, the shared
//! response schemas and the bearer token security scheme. Swagger UI serves
//! it in debug builds and `cargo run --bin openapi-dump` prints it.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::carts::{CartLineRequest, CartResponse};
use crate::inbound::http::orders::{
    CreateOrderBody, OrderItemRequest, OrderResponse, OrderSummaryResponse, UpdateOrderStatusBody,
};
use crate::inbound::http::schemas::{ErrorBody, PricedLineResponse, StoreDetailResponse};

/// Name of the bearer security scheme in the document.
pub const BEARER_SCHEME: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("HS256 access token whose `sub` is the user id."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace order API",
        description = "Carts, orders and stock for a multi-tenant marketplace."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::carts::upsert_cart_line,
        crate::inbound::http::carts::view_cart,
        crate::inbound::http::carts::clear_cart,
        crate::inbound::http::carts::checkout_cart,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::orders::list_my_orders,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        PricedLineResponse,
        StoreDetailResponse,
        CartLineRequest,
        CartResponse,
        OrderItemRequest,
        CreateOrderBody,
        UpdateOrderStatusBody,
        OrderResponse,
        OrderSummaryResponse,
    )),
    tags(
        (name = "carts", description = "Per-user shopping carts"),
        (name = "orders", description = "Order placement, status changes and history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

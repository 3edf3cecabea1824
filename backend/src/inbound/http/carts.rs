//! Cart HTTP handlers.
//!
//! ```text
//! PATCH  /api/carts           {item_id, quantity}
//! GET    /api/carts
//! DELETE /api/carts
//! POST   /api/carts/checkout
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpsertCartLineRequest;
use crate::domain::{CartView, Error, ItemId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::orders::OrderResponse;
use crate::inbound::http::schemas::{ErrorBody, StoreDetailResponse, store_details};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_field, require};

const ITEM_ID: FieldName = FieldName::new("item_id");
const QUANTITY: FieldName = FieldName::new("quantity");

/// Request payload setting one cart line.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CartLineRequest {
    /// Catalog item to set.
    pub item_id: Option<String>,
    /// New quantity. Zero removes the line; negative values are rejected.
    pub quantity: Option<i64>,
}

/// Priced cart grouped by store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CartResponse {
    pub details: Vec<StoreDetailResponse>,
    /// Sum of every store total.
    pub total_price: u64,
}

impl From<&CartView> for CartResponse {
    fn from(view: &CartView) -> Self {
        Self {
            details: store_details(view.details()),
            total_price: view.total_price(),
        }
    }
}

fn parse_cart_line(
    user_id: UserId,
    payload: CartLineRequest,
) -> Result<UpsertCartLineRequest, Error> {
    let item_id = require(payload.item_id, ITEM_ID, Error::missing_required_fields)?;
    let quantity = require(payload.quantity, QUANTITY, Error::missing_required_fields)?;
    // A malformed id cannot name a catalog item.
    let item_id: ItemId = parse_field(&item_id, ITEM_ID, Error::item_not_found)?;
    Ok(UpsertCartLineRequest {
        user_id,
        item_id,
        quantity,
    })
}

/// Set the quantity of one cart line.
#[utoipa::path(
    patch,
    path = "/api/carts",
    request_body = CartLineRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["carts"],
    operation_id = "upsertCartLine"
)]
#[patch("/carts")]
pub async fn upsert_cart_line(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CartLineRequest>,
) -> ApiResult<web::Json<CartResponse>> {
    let request = parse_cart_line(user.into_inner(), payload.into_inner())?;
    let view = state.carts.upsert_line(request).await?;
    Ok(web::Json(CartResponse::from(&view)))
}

/// Fetch the caller's priced cart.
#[utoipa::path(
    get,
    path = "/api/carts",
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["carts"],
    operation_id = "viewCart"
)]
#[get("/carts")]
pub async fn view_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<CartResponse>> {
    let view = state.carts_query.view(user.user_id()).await?;
    Ok(web::Json(CartResponse::from(&view)))
}

/// Remove every line from the caller's cart.
#[utoipa::path(
    delete,
    path = "/api/carts",
    responses(
        (status = 204, description = "Cart emptied"),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["carts"],
    operation_id = "clearCart"
)]
#[delete("/carts")]
pub async fn clear_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.carts.clear(user.user_id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Turn the caller's cart into an order.
#[utoipa::path(
    post,
    path = "/api/carts/checkout",
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 409, description = "Not enough stock", body = ErrorBody),
        (status = 422, description = "Cart is empty", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["carts"],
    operation_id = "checkoutCart"
)]
#[post("/carts/checkout")]
pub async fn checkout_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let order = state.carts.checkout(user.user_id()).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

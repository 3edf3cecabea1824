//! Order HTTP handlers.
//!
//! ```text
//! POST  /api/orders              {items: [{item_id, quantity}]}
//! GET   /api/orders/{order_id}
//! PATCH /api/orders/{order_id}   {status}
//! GET   /api/users/me/orders
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::domain::{Error, OrderId, OrderStatus, OrderSummary, OrderView, RequestedLine, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorBody, StoreDetailResponse, store_details};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_field, require};

const ITEMS: FieldName = FieldName::new("items");
const ITEM_ID: FieldName = FieldName::new("item_id");
const QUANTITY: FieldName = FieldName::new("quantity");
const STATUS: FieldName = FieldName::new("status");

/// One requested `(item, quantity)` pair.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderItemRequest {
    pub item_id: Option<String>,
    /// Units wanted; must be at least one.
    pub quantity: Option<i64>,
}

/// Request payload placing a direct order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateOrderBody {
    pub items: Option<Vec<OrderItemRequest>>,
}

/// Request payload changing an order's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderStatusBody {
    /// `CANCELED` or `COMPLETE`.
    #[schema(example = "CANCELED")]
    pub status: Option<String>,
}

/// Order header with its per-store breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order_id: Uuid,
    #[schema(example = "ORDERED")]
    pub status: String,
    pub details: Vec<StoreDetailResponse>,
    /// Total recorded when the order was placed.
    pub total_price: u64,
}

impl From<&OrderView> for OrderResponse {
    fn from(view: &OrderView) -> Self {
        Self {
            order_id: *view.order().id.as_uuid(),
            status: view.order().status.as_str().to_owned(),
            details: store_details(view.details()),
            total_price: view.total_price(),
        }
    }
}

/// One entry of the caller's order list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub order_id: Uuid,
    pub total_price: u64,
    #[schema(example = "COMPLETE")]
    pub status: String,
}

impl From<&OrderSummary> for OrderSummaryResponse {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            order_id: *summary.order_id.as_uuid(),
            total_price: summary.total_price,
            status: summary.status.as_str().to_owned(),
        }
    }
}

fn parse_create_order(
    user_id: UserId,
    payload: CreateOrderBody,
) -> Result<CreateOrderRequest, Error> {
    let items = require(payload.items, ITEMS, Error::missing_required_fields)?;
    let present = items
        .into_iter()
        .map(|item| {
            Ok((
                require(item.item_id, ITEM_ID, Error::missing_required_fields)?,
                require(item.quantity, QUANTITY, Error::missing_required_fields)?,
            ))
        })
        .collect::<Result<Vec<(String, i64)>, Error>>()?;
    // Ids that are not UUIDs cannot name a catalog item.
    let lines = present
        .into_iter()
        .map(|(item_id, quantity)| {
            Ok(RequestedLine {
                item_id: parse_field(&item_id, ITEM_ID, Error::item_not_found)?,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(CreateOrderRequest { user_id, lines })
}

/// Path ids that are not UUIDs cannot name an order.
fn parse_order_id(raw: &str) -> Result<OrderId, Error> {
    parse_field(raw, FieldName::new("order_id"), Error::order_not_found)
}

fn parse_status(payload: UpdateOrderStatusBody) -> Result<OrderStatus, Error> {
    let status = require(payload.status, STATUS, Error::missing_required_fields)?;
    parse_field(&status, STATUS, Error::invalid_field_format)
}

/// Place an order from an explicit item list.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 409, description = "Not enough stock", body = ErrorBody),
        (status = 422, description = "No items requested", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateOrderBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_order(user.into_inner(), payload.into_inner())?;
    let order = state.orders.create(request).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// Fetch one of the caller's orders.
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Order belongs to another user", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let order_id = parse_order_id(&path.into_inner())?;
    let order = state.orders_query.get(user.user_id(), &order_id).await?;
    Ok(web::Json(OrderResponse::from(&order)))
}

/// Cancel or complete one of the caller's orders.
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}",
    params(("order_id" = String, Path, description = "Order identifier")),
    request_body = UpdateOrderStatusBody,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Missing or unknown status", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Order belongs to another user", body = ErrorBody),
        (status = 404, description = "Order not found", body = ErrorBody),
        (status = 409, description = "Order already finished", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[patch("/orders/{order_id}")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateOrderStatusBody>,
) -> ApiResult<web::Json<OrderResponse>> {
    let order_id = parse_order_id(&path.into_inner())?;
    let status = parse_status(payload.into_inner())?;
    let order = state
        .orders
        .update_status(UpdateOrderStatusRequest {
            user_id: user.into_inner(),
            order_id,
            status,
        })
        .await?;
    Ok(web::Json(OrderResponse::from(&order)))
}

/// List the caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/users/me/orders",
    responses(
        (status = 200, description = "Order summaries", body = [OrderSummaryResponse]),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["orders"],
    operation_id = "listMyOrders"
)]
#[get("/users/me/orders")]
pub async fn list_my_orders(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<OrderSummaryResponse>>> {
    let orders = state.orders_query.list_for_user(user.user_id()).await?;
    Ok(web::Json(
        orders.iter().map(OrderSummaryResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{ErrorCode, ItemId};
    use crate::inbound::http::test_utils::{
        PortMocks, api_app, bearer, catalog_item, order_view_of,
    };

    fn item_request(item_id: Option<&str>, quantity: Option<i64>) -> OrderItemRequest {
        OrderItemRequest {
            item_id: item_id.map(str::to_owned),
            quantity,
        }
    }

    #[rstest]
    fn missing_item_list_is_a_missing_field() {
        let err = parse_create_order(UserId::random(), CreateOrderBody { items: None })
            .expect_err("missing items");
        assert_eq!(err.code(), ErrorCode::MissingRequiredFields);
    }

    #[rstest]
    fn empty_item_list_reaches_the_service() {
        let body = CreateOrderBody {
            items: Some(Vec::new()),
        };
        let request = parse_create_order(UserId::random(), body).expect("parsed");
        assert!(request.lines.is_empty());
    }

    #[rstest]
    #[case(item_request(None, Some(1)), ErrorCode::MissingRequiredFields)]
    #[case(
        item_request(Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"), None),
        ErrorCode::MissingRequiredFields
    )]
    #[case(item_request(Some("not-a-uuid"), Some(1)), ErrorCode::ItemNotFound)]
    fn malformed_lines_are_rejected(#[case] line: OrderItemRequest, #[case] code: ErrorCode) {
        let body = CreateOrderBody {
            items: Some(vec![line]),
        };
        let err = parse_create_order(UserId::random(), body).expect_err("rejected");
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn missing_fields_win_over_unknown_ids_in_earlier_lines() {
        let body = CreateOrderBody {
            items: Some(vec![
                item_request(Some("nope"), Some(1)),
                item_request(Some(&ItemId::random().to_string()), None),
            ]),
        };
        let err = parse_create_order(UserId::random(), body).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::MissingRequiredFields);
    }

    #[rstest]
    fn lines_keep_request_order_and_raw_quantities() {
        let first = ItemId::random();
        let second = ItemId::random();
        let body = CreateOrderBody {
            items: Some(vec![
                item_request(Some(&first.to_string()), Some(2)),
                item_request(Some(&second.to_string()), Some(0)),
            ]),
        };
        let request = parse_create_order(UserId::random(), body).expect("parsed");
        assert_eq!(
            request.lines,
            vec![
                RequestedLine {
                    item_id: first,
                    quantity: 2
                },
                RequestedLine {
                    item_id: second,
                    quantity: 0
                },
            ]
        );
    }

    #[rstest]
    #[case(None, ErrorCode::MissingRequiredFields)]
    #[case(Some("SHIPPED"), ErrorCode::InvalidFieldFormat)]
    #[case(Some("canceled"), ErrorCode::InvalidFieldFormat)]
    fn statuses_are_validated(#[case] status: Option<&str>, #[case] code: ErrorCode) {
        let body = UpdateOrderStatusBody {
            status: status.map(str::to_owned),
        };
        assert_eq!(parse_status(body).expect_err("rejected").code(), code);
    }

    #[rstest]
    fn malformed_path_ids_are_unknown_orders() {
        let err = parse_order_id("42").expect_err("not a uuid");
        assert_eq!(err.code(), ErrorCode::OrderNotFound);
    }

    #[actix_web::test]
    async fn create_returns_created_order() {
        let user_id = UserId::random();
        let item = catalog_item("Bread", 5000, 3000);
        let view = order_view_of(user_id, &item, 1, OrderStatus::Ordered);
        let item_id = item.id;

        let mut mocks = PortMocks::default();
        mocks
            .orders
            .expect_create()
            .withf(move |request| {
                request.user_id == user_id
                    && request.lines
                        == [RequestedLine {
                            item_id,
                            quantity: 1,
                        }]
            })
            .times(1)
            .return_once(move |_| Ok(view));

        let app = actix_test::init_service(
            api_app(mocks.into_state(user_id)).service(create_order),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/orders")
            .insert_header(bearer())
            .set_json(json!({"items": [{"item_id": item_id.to_string(), "quantity": 1}]}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: OrderResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.status, "ORDERED");
        assert_eq!(body.total_price, 8000);
        assert_eq!(body.details[0].delivery_fee, 3000);
    }

    #[actix_web::test]
    async fn not_enough_stock_is_a_conflict() {
        let user_id = UserId::random();
        let mut mocks = PortMocks::default();
        mocks
            .orders
            .expect_create()
            .return_once(|_| Err(Error::not_enough_stock()));

        let app = actix_test::init_service(
            api_app(mocks.into_state(user_id)).service(create_order),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/orders")
            .insert_header(bearer())
            .set_json(json!({
                "items": [{"item_id": ItemId::random().to_string(), "quantity": 99}]
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: ErrorBody = actix_test::read_body_json(res).await;
        assert_eq!(body.error_code, "ERR_017");
        assert_eq!(body.error_msg, "NOT ENOUGH STOCK");
    }

    #[actix_web::test]
    async fn get_with_malformed_id_is_not_found_without_a_lookup() {
        let user_id = UserId::random();
        let app = actix_test::init_service(
            api_app(PortMocks::default().into_state(user_id)).service(get_order),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/orders/not-a-uuid")
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = actix_test::read_body_json(res).await;
        assert_eq!(body.error_code, "ERR_019");
    }

    #[actix_web::test]
    async fn foreign_orders_are_forbidden() {
        let user_id = UserId::random();
        let order_id = OrderId::random();
        let mut mocks = PortMocks::default();
        mocks
            .orders_query
            .expect_get()
            .withf(move |user, order| *user == user_id && *order == order_id)
            .return_once(|_, _| Err(Error::not_your_order()));

        let app = actix_test::init_service(
            api_app(mocks.into_state(user_id)).service(get_order),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn cancel_forwards_the_parsed_status() {
        let user_id = UserId::random();
        let item = catalog_item("Milk", 1200, 500);
        let view = order_view_of(user_id, &item, 1, OrderStatus::Canceled);
        let order_id = view.order().id;

        let mut mocks = PortMocks::default();
        mocks
            .orders
            .expect_update_status()
            .withf(move |request| {
                request.order_id == order_id
                    && request.user_id == user_id
                    && request.status == OrderStatus::Canceled
            })
            .times(1)
            .return_once(move |_| Ok(view));

        let app = actix_test::init_service(
            api_app(mocks.into_state(user_id)).service(update_order_status),
        )
        .await;
        let req = actix_test::TestRequest::patch()
            .uri(&format!("/orders/{order_id}"))
            .insert_header(bearer())
            .set_json(json!({"status": "CANCELED"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: OrderResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.status, "CANCELED");
    }

    #[actix_web::test]
    async fn listing_maps_summaries() {
        let user_id = UserId::random();
        let summaries = vec![
            OrderSummary {
                order_id: OrderId::random(),
                total_price: 4200,
                status: OrderStatus::Complete,
            },
            OrderSummary {
                order_id: OrderId::random(),
                total_price: 800,
                status: OrderStatus::Ordered,
            },
        ];
        let expected: Vec<OrderSummaryResponse> =
            summaries.iter().map(OrderSummaryResponse::from).collect();

        let mut mocks = PortMocks::default();
        mocks
            .orders_query
            .expect_list_for_user()
            .return_once(move |_| Ok(summaries));

        let app = actix_test::init_service(
            api_app(mocks.into_state(user_id)).service(list_my_orders),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/users/me/orders")
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<OrderSummaryResponse> = actix_test::read_body_json(res).await;
        assert_eq!(body, expected);
        assert_eq!(body[0].status, "COMPLETE");
    }
}

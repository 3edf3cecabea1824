//! Cart domain service implementing the cart driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::checkout::plan_cart_checkout;
use crate::domain::order_service::{commit_draft, map_catalog_error};
use crate::domain::ports::{
    CartCommand, CartQuery, CartRepository, CartRepositoryError, CatalogLookup, OrderRepository,
    UpsertCartLineRequest,
};
use crate::domain::{CartLine, CartQuantity, CartView, Error, OrderView, UserId};

/// Cart service; checkout hands the cart to the order repository.
#[derive(Clone)]
pub struct CartService<C, R, O> {
    catalog: Arc<C>,
    carts: Arc<R>,
    orders: Arc<O>,
}

impl<C, R, O> CartService<C, R, O> {
    /// Create a new service with the given ports.
    pub const fn new(catalog: Arc<C>, carts: Arc<R>, orders: Arc<O>) -> Self {
        Self {
            catalog,
            carts,
            orders,
        }
    }
}

fn map_cart_error(error: CartRepositoryError) -> Error {
    match error {
        CartRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("cart repository unavailable: {message}"))
        }
        CartRepositoryError::Query { message } => {
            Error::internal(format!("cart repository error: {message}"))
        }
    }
}

impl<C, R, O> CartService<C, R, O>
where
    C: CatalogLookup,
    R: CartRepository,
    O: OrderRepository,
{
    async fn current_view(&self, user_id: &UserId) -> Result<CartView, Error> {
        let entries = self
            .carts
            .entries_for(user_id)
            .await
            .map_err(map_cart_error)?;
        CartView::from_entries(&entries)
    }
}

#[async_trait]
impl<C, R, O> CartCommand for CartService<C, R, O>
where
    C: CatalogLookup,
    R: CartRepository,
    O: OrderRepository,
{
    async fn upsert_line(&self, request: UpsertCartLineRequest) -> Result<CartView, Error> {
        let UpsertCartLineRequest {
            user_id,
            item_id,
            quantity,
        } = request;

        let found = self
            .catalog
            .find_items(&[item_id])
            .await
            .map_err(map_catalog_error)?;
        if !found.iter().any(|item| item.id == item_id) {
            return Err(Error::item_not_found());
        }

        match CartQuantity::from_requested(quantity)? {
            CartQuantity::Set(quantity) => {
                self.carts
                    .upsert_line(&CartLine {
                        user_id,
                        item_id,
                        quantity,
                    })
                    .await
                    .map_err(map_cart_error)?;
                debug!(%user_id, %item_id, quantity = quantity.get(), "cart line set");
            }
            CartQuantity::Remove => {
                self.carts
                    .remove_line(&user_id, &item_id)
                    .await
                    .map_err(map_cart_error)?;
                debug!(%user_id, %item_id, "cart line removed");
            }
        }

        self.current_view(&user_id).await
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), Error> {
        self.carts.clear(user_id).await.map_err(map_cart_error)
    }

    async fn checkout(&self, user_id: &UserId) -> Result<OrderView, Error> {
        let entries = self
            .carts
            .entries_for(user_id)
            .await
            .map_err(map_cart_error)?;
        let draft = plan_cart_checkout(*user_id, &entries)?;
        commit_draft(self.orders.as_ref(), draft).await
    }
}

#[async_trait]
impl<C, R, O> CartQuery for CartService<C, R, O>
where
    C: CatalogLookup,
    R: CartRepository,
    O: OrderRepository,
{
    async fn view(&self, user_id: &UserId) -> Result<CartView, Error> {
        self.current_view(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{MockCartRepository, MockCatalogLookup, MockOrderRepository};
    use crate::domain::{
        CartEntry, CatalogItem, ErrorCode, ItemId, Order, OrderStatus, StoreId, StoreSnapshot,
    };

    type Service = CartService<MockCatalogLookup, MockCartRepository, MockOrderRepository>;

    fn make_service(
        catalog: MockCatalogLookup,
        carts: MockCartRepository,
        orders: MockOrderRepository,
    ) -> Service {
        CartService::new(Arc::new(catalog), Arc::new(carts), Arc::new(orders))
    }

    #[fixture]
    fn mug() -> CatalogItem {
        CatalogItem {
            id: ItemId::random(),
            name: "Mug".to_owned(),
            price: 5000,
            stock: 4,
            store: StoreSnapshot {
                id: StoreId::random(),
                name: "Pottery".to_owned(),
                delivery_fee: 2500,
            },
        }
    }

    fn catalog_with(item: CatalogItem) -> MockCatalogLookup {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_find_items()
            .return_once(move |_| Ok(vec![item]));
        catalog
    }

    fn entry(item: CatalogItem, quantity: u32) -> CartEntry {
        CartEntry {
            quantity: NonZeroU32::new(quantity).expect("non-zero"),
            item,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_positive_quantity_saves_line(mug: CatalogItem) {
        let user_id = UserId::random();
        let item_id = mug.id;
        let mut carts = MockCartRepository::new();
        carts
            .expect_upsert_line()
            .withf(move |line| line.item_id == item_id && line.quantity.get() == 2)
            .times(1)
            .return_once(|_| Ok(()));
        let listed = entry(mug.clone(), 2);
        carts
            .expect_entries_for()
            .with(eq(user_id))
            .return_once(move |_| Ok(vec![listed]));
        let service = make_service(catalog_with(mug), carts, MockOrderRepository::new());

        let view = service
            .upsert_line(UpsertCartLineRequest {
                user_id,
                item_id,
                quantity: 2,
            })
            .await
            .expect("cart view");

        assert_eq!(view.total_price(), 12_500);
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_zero_removes_line(mug: CatalogItem) {
        let user_id = UserId::random();
        let item_id = mug.id;
        let mut carts = MockCartRepository::new();
        carts.expect_upsert_line().never();
        carts
            .expect_remove_line()
            .with(eq(user_id), eq(item_id))
            .times(1)
            .return_once(|_, _| Ok(()));
        carts.expect_entries_for().return_once(|_| Ok(Vec::new()));
        let service = make_service(catalog_with(mug), carts, MockOrderRepository::new());

        let view = service
            .upsert_line(UpsertCartLineRequest {
                user_id,
                item_id,
                quantity: 0,
            })
            .await
            .expect("cart view");

        assert!(view.is_empty());
        assert_eq!(view.total_price(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_negative_quantity_is_invalid(mug: CatalogItem) {
        let item_id = mug.id;
        let mut carts = MockCartRepository::new();
        carts.expect_upsert_line().never();
        carts.expect_remove_line().never();
        let service = make_service(catalog_with(mug), carts, MockOrderRepository::new());

        let err = service
            .upsert_line(UpsertCartLineRequest {
                user_id: UserId::random(),
                item_id,
                quantity: -1,
            })
            .await
            .expect_err("negative");

        assert_eq!(err.code(), ErrorCode::InvalidCartField);
    }

    #[tokio::test]
    async fn upsert_unknown_item_is_not_found() {
        let mut catalog = MockCatalogLookup::new();
        catalog.expect_find_items().return_once(|_| Ok(Vec::new()));
        let mut carts = MockCartRepository::new();
        carts.expect_upsert_line().never();
        let service = make_service(catalog, carts, MockOrderRepository::new());

        let err = service
            .upsert_line(UpsertCartLineRequest {
                user_id: UserId::random(),
                item_id: ItemId::random(),
                quantity: -3,
            })
            .await
            .expect_err("missing item");

        assert_eq!(err.code(), ErrorCode::ItemNotFound);
    }

    #[tokio::test]
    async fn empty_cart_checkout_is_rejected_before_commit() {
        let mut carts = MockCartRepository::new();
        carts.expect_entries_for().return_once(|_| Ok(Vec::new()));
        let mut orders = MockOrderRepository::new();
        orders.expect_place().never();
        let service = make_service(MockCatalogLookup::new(), carts, orders);

        let err = service
            .checkout(&UserId::random())
            .await
            .expect_err("empty");

        assert_eq!(err.code(), ErrorCode::EmptyCart);
    }

    #[rstest]
    #[tokio::test]
    async fn checkout_above_stock_leaves_cart_alone(mug: CatalogItem) {
        let listed = entry(mug, 5);
        let mut carts = MockCartRepository::new();
        carts
            .expect_entries_for()
            .return_once(move |_| Ok(vec![listed]));
        carts.expect_clear().never();
        let mut orders = MockOrderRepository::new();
        orders.expect_place().never();
        let service = make_service(MockCatalogLookup::new(), carts, orders);

        let err = service
            .checkout(&UserId::random())
            .await
            .expect_err("stock");

        assert_eq!(err.code(), ErrorCode::NotEnoughStock);
    }

    #[rstest]
    #[tokio::test]
    async fn checkout_commits_cart_draft(mug: CatalogItem) {
        let user_id = UserId::random();
        let listed = entry(mug, 1);
        let mut carts = MockCartRepository::new();
        carts
            .expect_entries_for()
            .return_once(move |_| Ok(vec![listed]));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_place()
            .withf(move |draft| draft.clears_cart() && draft.user_id == user_id)
            .times(1)
            .returning(|draft| {
                Ok(Order {
                    id: draft.order_id,
                    user_id: draft.user_id,
                    status: OrderStatus::Ordered,
                    total_price: draft.total_price(),
                    created_at: Utc::now(),
                })
            });
        let service = make_service(MockCatalogLookup::new(), carts, orders);

        let view = service.checkout(&user_id).await.expect("order");

        assert_eq!(view.total_price(), 7500);
        assert_eq!(view.order().status, OrderStatus::Ordered);
    }

    #[rstest]
    #[case(CartRepositoryError::connection("reset"), ErrorCode::ServiceUnavailable)]
    #[case(CartRepositoryError::query("bad sql"), ErrorCode::Unexpected)]
    #[tokio::test]
    async fn view_maps_repository_failures(
        #[case] failure: CartRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut carts = MockCartRepository::new();
        carts
            .expect_entries_for()
            .return_once(move |_| Err(failure));
        let service = make_service(MockCatalogLookup::new(), carts, MockOrderRepository::new());

        let err = service.view(&UserId::random()).await.expect_err("failure");

        assert_eq!(err.code(), expected);
    }
}

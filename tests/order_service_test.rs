//! Order service unit tests.
//!
//! Placement itself needs a live transaction and is covered by the
//! database-backed tests; these cover the pre-checks, ownership rules
//! and status transitions.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use shop_api::domain::{OrderLine, OrderStatus, UserRole};
use shop_api::errors::AppError;
use shop_api::services::{OrderManager, OrderService};
use shop_api::types::PaginationParams;

use common::{test_order, test_user, MockOrderRepo, TestUnitOfWork};

fn service(uow: TestUnitOfWork) -> OrderManager<TestUnitOfWork> {
    OrderManager::new(Arc::new(uow))
}

#[tokio::test]
async fn place_order_rejects_empty_order() {
    let user = test_user(Uuid::new_v4(), UserRole::Customer);

    let result = service(TestUnitOfWork::new())
        .place_order(&user, Vec::new())
        .await;

    assert!(matches!(result, Err(AppError::EmptyOrder)));
}

#[tokio::test]
async fn place_order_rejects_non_positive_quantity() {
    let user = test_user(Uuid::new_v4(), UserRole::Customer);
    let lines = vec![
        OrderLine {
            product_id: Uuid::new_v4(),
            quantity: 2,
        },
        OrderLine {
            product_id: Uuid::new_v4(),
            quantity: 0,
        },
    ];

    let result = service(TestUnitOfWork::new()).place_order(&user, lines).await;

    assert!(matches!(result, Err(AppError::InvalidQuantity)));
}

#[tokio::test]
async fn get_order_returns_own_order() {
    let user = test_user(Uuid::new_v4(), UserRole::Customer);
    let order_id = Uuid::new_v4();
    let user_id = user.id;

    let mut orders = MockOrderRepo::new();
    orders
        .expect_find_with_items()
        .with(eq(order_id))
        .returning(move |id| Ok(Some(test_order(id, user_id, OrderStatus::Pending))));

    let order = service(TestUnitOfWork::new().with_orders(orders))
        .get_order(&user, order_id)
        .await
        .unwrap();

    assert_eq!(order.id, order_id);
    assert_eq!(order.user_id, user.id);
}

#[tokio::test]
async fn get_order_rejects_other_users_orders() {
    let requester = test_user(Uuid::new_v4(), UserRole::Customer);
    let owner_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepo::new();
    orders
        .expect_find_with_items()
        .returning(move |id| Ok(Some(test_order(id, owner_id, OrderStatus::Pending))));

    let result = service(TestUnitOfWork::new().with_orders(orders))
        .get_order(&requester, order_id)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn get_order_allows_admin_access_to_any_order() {
    let admin = test_user(Uuid::new_v4(), UserRole::Admin);
    let owner_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepo::new();
    orders
        .expect_find_with_items()
        .returning(move |id| Ok(Some(test_order(id, owner_id, OrderStatus::Shipped))));

    let order = service(TestUnitOfWork::new().with_orders(orders))
        .get_order(&admin, order_id)
        .await
        .unwrap();

    assert_eq!(order.user_id, owner_id);
}

#[tokio::test]
async fn get_order_returns_identical_data_across_reads() {
    let user = test_user(Uuid::new_v4(), UserRole::Customer);
    let user_id = user.id;
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepo::new();
    orders
        .expect_find_with_items()
        .times(2)
        .returning(move |id| Ok(Some(test_order(id, user_id, OrderStatus::Pending))));

    let svc = service(TestUnitOfWork::new().with_orders(orders));
    let first = svc.get_order(&user, order_id).await.unwrap();
    let second = svc.get_order(&user, order_id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.user_id, second.user_id);
    assert_eq!(first.total, second.total);
    assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn list_own_orders_scopes_to_user() {
    let user = test_user(Uuid::new_v4(), UserRole::Customer);
    let user_id = user.id;

    let mut orders = MockOrderRepo::new();
    orders
        .expect_list_by_user()
        .withf(move |uid, _| *uid == user_id)
        .returning(move |uid, _| {
            Ok((
                vec![
                    test_order(Uuid::new_v4(), uid, OrderStatus::Pending),
                    test_order(Uuid::new_v4(), uid, OrderStatus::Delivered),
                ],
                2,
            ))
        });

    let (listed, total) = service(TestUnitOfWork::new().with_orders(orders))
        .list_own_orders(&user, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|o| o.user_id == user.id));
}

#[tokio::test]
async fn list_all_orders_passes_status_filter() {
    let mut orders = MockOrderRepo::new();
    orders
        .expect_list_all()
        .withf(|status, _| *status == Some(OrderStatus::Shipped))
        .returning(|_, _| Ok((vec![], 0)));

    let result = service(TestUnitOfWork::new().with_orders(orders))
        .list_all_orders(Some(OrderStatus::Shipped), PaginationParams::default())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn update_status_moves_pending_order() {
    let order_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut orders = MockOrderRepo::new();
    orders
        .expect_find_with_items()
        .returning(move |id| Ok(Some(test_order(id, owner_id, OrderStatus::Pending))));
    orders
        .expect_update_status()
        .with(eq(order_id), eq(OrderStatus::Processing))
        .returning(move |id, status| Ok(test_order(id, owner_id, status)));

    let order = service(TestUnitOfWork::new().with_orders(orders))
        .update_status(order_id, OrderStatus::Processing)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Processing);
}

#[tokio::test]
async fn update_status_rejects_terminal_orders() {
    let owner_id = Uuid::new_v4();

    for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        let mut orders = MockOrderRepo::new();
        orders
            .expect_find_with_items()
            .returning(move |id| Ok(Some(test_order(id, owner_id, terminal))));

        let result = service(TestUnitOfWork::new().with_orders(orders))
            .update_status(Uuid::new_v4(), OrderStatus::Processing)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}

#[tokio::test]
async fn update_status_of_missing_order_is_not_found() {
    let mut orders = MockOrderRepo::new();
    orders.expect_find_with_items().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::new().with_orders(orders))
        .update_status(Uuid::new_v4(), OrderStatus::Processing)
        .await;

    assert!(matches!(result, Err(AppError::OrderNotFound(_))));
}

//! Router-level authorization tests.
//!
//! Service unit tests bypass the extractors, so these drive real HTTP
//! requests through `create_router` with mocked services to check the
//! role gates on admin routes.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use async_trait::async_trait;
use mockall::mock;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

use shop_api::api::{create_router, AppState};
use shop_api::config::Config;
use shop_api::domain::{
    Category, CategoryUpdate, NewCategory, NewProduct, Order, OrderLine, OrderStatus, Product,
    ProductFilter, ProductUpdate, User, UserRole,
};
use shop_api::errors::AppResult;
use shop_api::infra::Database;
use shop_api::services::{AuthService, CatalogService, OrderService, TokenResponse};
use shop_api::types::PaginationParams;

use common::test_user;

mock! {
    Auth {}

    #[async_trait]
    impl AuthService for Auth {
        async fn register(
            &self,
            email: String,
            password: String,
            full_name: String,
        ) -> AppResult<User>;
        async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;
        async fn resolve_user(&self, token: &str) -> AppResult<User>;
    }
}

mock! {
    Catalog {}

    #[async_trait]
    impl CatalogService for Catalog {
        async fn list_categories(&self) -> AppResult<Vec<Category>>;
        async fn get_category(&self, id: Uuid) -> AppResult<Category>;
        async fn create_category(&self, new: NewCategory) -> AppResult<Category>;
        async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category>;
        async fn delete_category(&self, id: Uuid) -> AppResult<()>;
        async fn list_products(
            &self,
            filter: ProductFilter,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Product>, u64)>;
        async fn get_product(&self, id: Uuid) -> AppResult<Product>;
        async fn create_product(&self, new: NewProduct) -> AppResult<Product>;
        async fn update_product(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;
        async fn delete_product(&self, id: Uuid) -> AppResult<()>;
    }
}

mock! {
    Orders {}

    #[async_trait]
    impl OrderService for Orders {
        async fn place_order(&self, user: &User, lines: Vec<OrderLine>) -> AppResult<Order>;
        async fn list_own_orders(
            &self,
            user: &User,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Order>, u64)>;
        async fn get_order(&self, requester: &User, id: Uuid) -> AppResult<Order>;
        async fn list_all_orders(
            &self,
            status: Option<OrderStatus>,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Order>, u64)>;
        async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
    }
}

fn app(auth: MockAuth, orders: MockOrders) -> axum::Router {
    let state = AppState::new(
        Arc::new(auth),
        Arc::new(MockCatalog::new()),
        Arc::new(orders),
        Arc::new(Database::from_connection(DatabaseConnection::Disconnected)),
        Config::default(),
    );
    create_router(state)
}

fn resolving_to(role: UserRole) -> MockAuth {
    let mut auth = MockAuth::new();
    auth.expect_resolve_user()
        .returning(move |_| Ok(test_user(Uuid::new_v4(), role)));
    auth
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn update_status_rejects_customer_with_403() {
    let response = app(resolving_to(UserRole::Customer), MockOrders::new())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/orders/{}/status", Uuid::new_v4()))
                .header("authorization", "Bearer customer-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status":"processing"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn admin_listing_rejects_customer_with_403() {
    let response = app(resolving_to(UserRole::Customer), MockOrders::new())
        .oneshot(
            Request::builder()
                .uri("/orders/admin/all")
                .header("authorization", "Bearer customer-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn admin_listing_rejects_missing_token_with_401() {
    let response = app(MockAuth::new(), MockOrders::new())
        .oneshot(
            Request::builder()
                .uri("/orders/admin/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_listing_passes_admin_through() {
    let mut orders = MockOrders::new();
    orders
        .expect_list_all_orders()
        .returning(|_, _| Ok((Vec::new(), 0)));

    let response = app(resolving_to(UserRole::Admin), orders)
        .oneshot(
            Request::builder()
                .uri("/orders/admin/all")
                .header("authorization", "Bearer admin-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 0);
}

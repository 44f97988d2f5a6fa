//! API surface tests: error mapping and response serialization.
//!
//! These run without a database; endpoint behavior against real data
//! lives in the database-backed order flow tests.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use uuid::Uuid;

use shop_api::domain::{OrderStatus, UserRole};
use shop_api::errors::AppError;

async fn error_body(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn unauthorized_maps_to_401() {
    let (status, body) = error_body(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn invalid_credentials_map_to_401() {
    let (status, _) = error_body(AppError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn disabled_account_maps_to_403() {
    let (status, body) = error_body(AppError::AccountDisabled).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn forbidden_maps_to_403() {
    let (status, _) = error_body(AppError::Forbidden).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn not_found_variants_map_to_404() {
    for err in [
        AppError::NotFound,
        AppError::CategoryNotFound(Uuid::new_v4()),
        AppError::ProductNotFound(Uuid::new_v4()),
        AppError::OrderNotFound(Uuid::new_v4()),
    ] {
        let (status, _) = error_body(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn conflict_maps_to_409() {
    let (status, body) = error_body(AppError::conflict("Category name already exists")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Category name already exists");
}

#[tokio::test]
async fn order_input_errors_map_to_400() {
    for err in [
        AppError::EmptyOrder,
        AppError::InvalidQuantity,
        AppError::validation("No fields to update"),
    ] {
        let (status, _) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn insufficient_stock_names_product_and_available_units() {
    let (status, body) = error_body(AppError::InsufficientStock {
        product: "Desk Lamp".to_string(),
        available: 3,
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Desk Lamp"));
    assert!(message.contains('3'));
}

#[tokio::test]
async fn placement_failure_maps_to_503_and_promises_no_changes() {
    let (status, body) = error_body(AppError::OrderPlacementFailed).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("No changes were made"));
}

#[tokio::test]
async fn database_errors_hide_details_from_clients() {
    let err = AppError::Database(sea_orm::DbErr::Custom(
        "connection refused at 10.0.0.5".to_string(),
    ));
    let (status, body) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("10.0.0.5"));
}

#[tokio::test]
async fn order_status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&OrderStatus::Processing).unwrap(),
        "\"processing\""
    );
    let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn user_role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    assert_eq!(UserRole::from("admin"), UserRole::Admin);
    // Unknown values default to customer
    assert_eq!(UserRole::from("superuser"), UserRole::Customer);
}

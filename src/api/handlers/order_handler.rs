//! Order handlers.
//!
//! Every order route requires a login; the admin listing and status
//! update additionally require the admin role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{AdminUser, CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::domain::{OrderLine, OrderResponse, OrderStatus};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginatedOrders, PaginationParams};

/// One line of an order placement request
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    /// Product to order
    pub product_id: Uuid,
    /// Requested quantity, at least 1
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

/// Order placement request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

/// Order status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusUpdateRequest {
    pub status: OrderStatus,
}

/// Admin order list query parameters.
///
/// Pagination fields are spelled out because serde_urlencoded cannot
/// flatten structs with numeric fields.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    /// Only orders in this status
    pub status: Option<OrderStatus>,
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

impl OrderListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_own_orders).post(place_order))
        .route("/admin/all", get(list_all_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_order_status))
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty order, bad quantity or insufficient stock"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Product not found"),
        (status = 503, description = "Transient conflict, retry")
    )
)]
pub async fn place_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let lines = payload
        .items
        .into_iter()
        .map(|item| OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let order = state.order_service.place_order(&user, lines).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// List the authenticated user's orders in creation order
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "The user's orders", body = PaginatedOrders),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_own_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    let (orders, total) = state
        .order_service
        .list_own_orders(&user, pagination.clone())
        .await?;

    Ok(Json(Paginated::new(
        orders.into_iter().map(OrderResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// List all orders across users (admin only)
#[utoipa::path(
    get,
    path = "/orders/admin/all",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(OrderListQuery),
    responses(
        (status = 200, description = "All orders", body = PaginatedOrders),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    let pagination = query.pagination();
    let (orders, total) = state
        .order_service
        .list_all_orders(query.status, pagination.clone())
        .await?;

    Ok(Json(Paginated::new(
        orders.into_iter().map(OrderResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Get one order; customers can only read their own
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the order's owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.order_service.get_order(&user, id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Update an order's status (admin only)
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = OrderStatusUpdateRequest,
    responses(
        (status = 200, description = "Order status updated", body = OrderResponse),
        (status = 400, description = "Order is in a terminal status"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusUpdateRequest>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.order_service.update_status(id, payload.status).await?;
    Ok(Json(OrderResponse::from(order)))
}

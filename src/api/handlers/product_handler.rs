//! Product handlers.
//!
//! Reads are public; writes require an admin token.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{AdminUser, ValidatedJson};
use crate::api::AppState;
use crate::domain::{NewProduct, ProductFilter, ProductResponse, ProductUpdate};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginatedProducts, PaginationParams};

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Mechanical Keyboard")]
    pub name: String,
    pub description: Option<String>,
    /// Unit price, must be greater than zero
    #[schema(value_type = String, example = "199.90")]
    pub price: Decimal,
    /// Units in stock, must not be negative
    #[schema(example = 25)]
    pub stock: i32,
    /// Category the product belongs to
    pub category_id: Uuid,
    pub image_url: Option<String>,
}

/// Product update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
}

/// Product list query parameters.
///
/// Pagination fields are spelled out because serde_urlencoded cannot
/// flatten structs with numeric fields.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Only products in this category
    pub category_id: Option<Uuid>,
    /// Minimum price, inclusive
    pub min_price: Option<Decimal>,
    /// Maximum price, inclusive
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match on name or description
    pub search: Option<String>,
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

impl ProductListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products with filters and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Matching products", body = PaginatedProducts)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Paginated<ProductResponse>>> {
    let pagination = query.pagination();
    let filter = ProductFilter {
        category_id: query.category_id,
        min_price: query.min_price,
        max_price: query.max_price,
        search: query.search,
    };

    let (products, total) = state
        .catalog_service
        .list_products(filter, pagination.clone())
        .await?;

    Ok(Json(Paginated::new(
        products.into_iter().map(ProductResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.catalog_service.get_product(id).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<ProductResponse>> {
    let product = state
        .catalog_service
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
            category_id: payload.category_id,
            image_url: payload.image_url,
        })
        .await?;

    Ok(Created(ProductResponse::from(product)))
}

/// Update a product (admin only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let product = state
        .catalog_service
        .update_product(
            id,
            ProductUpdate {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                stock: payload.stock,
                category_id: payload.category_id,
                image_url: payload.image_url,
            },
        )
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_product(id).await?;
    Ok(NoContent)
}

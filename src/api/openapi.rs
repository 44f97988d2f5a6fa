//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, category_handler, order_handler, product_handler};
use crate::domain::{
    CategoryResponse, OrderItemResponse, OrderResponse, OrderStatus, ProductResponse,
    UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::{PaginatedOrders, PaginatedProducts, PaginationMeta};

/// OpenAPI documentation for the Shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Catalog and order backend with JWT authentication, built on Axum and SeaORM",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        // Category endpoints
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        // Product endpoints
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Order endpoints
        order_handler::place_order,
        order_handler::list_own_orders,
        order_handler::list_all_orders,
        order_handler::get_order,
        order_handler::update_order_status,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            CategoryResponse,
            ProductResponse,
            OrderStatus,
            OrderItemResponse,
            OrderResponse,
            // Shared types
            PaginationMeta,
            PaginatedProducts,
            PaginatedOrders,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Catalog request types
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            // Order request types
            order_handler::OrderItemRequest,
            order_handler::CreateOrderRequest,
            order_handler::OrderStatusUpdateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Categories", description = "Category catalog management"),
        (name = "Products", description = "Product catalog management"),
        (name = "Orders", description = "Order placement and tracking")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

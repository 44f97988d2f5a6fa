//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod category;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use category::{Category, CategoryResponse, CategoryUpdate, NewCategory};
pub use order::{
    Order, OrderItem, OrderItemResponse, OrderLine, OrderResponse, OrderStatus,
};
pub use password::Password;
pub use product::{NewProduct, Product, ProductFilter, ProductResponse, ProductUpdate};
pub use user::{User, UserResponse, UserRole};

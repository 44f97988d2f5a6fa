//! Shared types used across handlers and services.

mod pagination;
mod response;

pub use pagination::{
    Paginated, PaginatedOrders, PaginatedProducts, PaginationMeta, PaginationParams,
};
pub use response::{Created, NoContent};

//! Service layer - Business logic
//!
//! Services orchestrate domain logic over the Unit of Work and are
//! exposed to handlers as trait objects for dependency injection.

mod auth_service;
mod catalog_service;
mod container;
mod order_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use catalog_service::{Catalog, CatalogService};
pub use container::Services;
pub use order_service::{OrderManager, OrderService};

//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, CatalogService, OrderService, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Order service
    pub order_service: Arc<dyn OrderService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone());

        Self {
            auth_service: container.auth(),
            catalog_service: container.catalog(),
            order_service: container.orders(),
            database,
            config,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        catalog_service: Arc<dyn CatalogService>,
        order_service: Arc<dyn OrderService>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            catalog_service,
            order_service,
            database,
            config,
        }
    }
}

//! Service Container - Centralized service access.
//!
//! Holds every application service behind its trait so handlers depend
//! on abstractions, not implementations.

use std::sync::Arc;

use super::{AuthService, Authenticator, Catalog, CatalogService, OrderManager, OrderService};
use crate::config::Config;
use crate::infra::Persistence;

/// Concrete service container
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let catalog_service = Arc::new(Catalog::new(uow.clone()));
        let order_service = Arc::new(OrderManager::new(uow));

        Self {
            auth_service,
            catalog_service,
            order_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get catalog service
    pub fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    /// Get order service
    pub fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}

//! Catalog service - Category and product management.
//!
//! Reads are public; writes are admin-only, which the handlers enforce
//! before calling in. The service owns the catalog's business rules:
//! unique category names, positive prices, non-negative stock, and the
//! "no orphaned products" guard on category deletion.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List all categories
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Get a category by ID
    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    /// Create a category; fails with a conflict if the name is taken
    async fn create_category(&self, new: NewCategory) -> AppResult<Category>;

    /// Update a category's fields
    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category>;

    /// Delete a category; fails if any product still references it
    async fn delete_category(&self, id: Uuid) -> AppResult<()>;

    /// List products matching the filter, with the total count before paging
    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Get a product by ID
    async fn get_product(&self, id: Uuid) -> AppResult<Product>;

    /// Create a product in an existing category
    async fn create_product(&self, new: NewProduct) -> AppResult<Product>;

    /// Update a product's fields
    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;

    /// Delete a product
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be greater than zero"));
    }
    Ok(())
}

fn check_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::validation("Stock cannot be negative"));
    }
    Ok(())
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    /// Create new catalog service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn check_category_exists(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or(AppError::CategoryNotFound(id))?;
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or(AppError::CategoryNotFound(id))
    }

    async fn create_category(&self, new: NewCategory) -> AppResult<Category> {
        if self.uow.categories().find_by_name(&new.name).await?.is_some() {
            return Err(AppError::conflict("Category name already exists"));
        }

        self.uow.categories().create(new).await
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category> {
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        if let Some(name) = &update.name {
            // Renaming onto another category's name is a conflict
            if let Some(existing) = self.uow.categories().find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Category name already exists"));
                }
            }
        }

        self.uow.categories().update(id, update).await
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.check_category_exists(id).await?;

        let products = self.uow.categories().count_products(id).await?;
        if products > 0 {
            return Err(AppError::conflict(
                "Cannot delete a category that still has products",
            ));
        }

        self.uow.categories().delete(id).await
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        self.uow.products().list(filter, pagination).await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    async fn create_product(&self, new: NewProduct) -> AppResult<Product> {
        check_price(new.price)?;
        check_stock(new.stock)?;
        self.check_category_exists(new.category_id).await?;

        self.uow.products().create(new).await
    }

    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product> {
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        if let Some(price) = update.price {
            check_price(price)?;
        }
        if let Some(stock) = update.stock {
            check_stock(stock)?;
        }
        if let Some(category_id) = update.category_id {
            self.check_category_exists(category_id).await?;
        }

        self.uow.products().update(id, update).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await
    }
}

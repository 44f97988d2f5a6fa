//! Product repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductFilter, ProductUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Product repository trait for dependency injection.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// List products matching the filter, with the total count before paging
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Create a new product
    async fn create(&self, new: NewProduct) -> AppResult<Product>;

    /// Update product fields; `None` fields are left unchanged
    async fn update(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository backed by SeaORM
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filter_condition(filter: &ProductFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(category_id) = filter.category_id {
        condition = condition.add(product::Column::CategoryId.eq(category_id));
    }
    if let Some(min_price) = filter.min_price {
        condition = condition.add(product::Column::Price.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        condition = condition.add(product::Column::Price.lte(max_price));
    }
    if let Some(search) = &filter.search {
        // ILIKE: LIKE is case-sensitive on PostgreSQL
        let pattern = format!("%{search}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(product::Column::Name).ilike(pattern.as_str()))
                .add(Expr::col(product::Column::Description).ilike(pattern.as_str())),
        );
    }

    condition
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let condition = filter_condition(&filter);

        let total = ProductEntity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = ProductEntity::find()
            .filter(condition)
            .order_by_asc(product::Column::Name)
            .offset(pagination.offset())
            .limit(pagination.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn create(&self, new: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            stock: Set(new.stock),
            category_id: Set(new.category_id),
            image_url: Set(new.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::ProductNotFound(id))?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(stock) = update.stock {
            active.stock = Set(stock);
        }
        if let Some(category_id) = update.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(image_url) = update.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::ProductNotFound(id));
        }

        Ok(())
    }
}

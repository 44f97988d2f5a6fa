//! Category repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{category, product};
use crate::domain::{Category, CategoryUpdate, NewCategory};
use crate::errors::{AppError, AppResult};

/// Category repository trait for dependency injection.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Find category by its unique name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Create a new category
    async fn create(&self, new: NewCategory) -> AppResult<Category>;

    /// Update category fields; `None` fields are left unchanged
    async fn update(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category>;

    /// Delete category by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Count products referencing this category
    async fn count_products(&self, id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of CategoryRepository backed by SeaORM
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, new: NewCategory) -> AppResult<Category> {
        let now = chrono::Utc::now();
        let active_model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category> {
        let existing = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::CategoryNotFound(id))?;

        let mut active: category::ActiveModel = existing.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::CategoryNotFound(id));
        }

        Ok(())
    }

    async fn count_products(&self, id: Uuid) -> AppResult<u64> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

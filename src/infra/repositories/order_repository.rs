//! Order repository implementation.
//!
//! Reads assemble the full aggregate (order plus items in line order).
//! Writes that touch stock happen through the unit of work instead, so
//! they share a transaction with the inventory decrement.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::entities::{order, order_item};
use crate::domain::{Order, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Order repository trait for dependency injection.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order with its items
    async fn find_with_items(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// List a user's orders in creation order, with items and the total
    /// count before paging
    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// List all orders, optionally filtered by status, with the total
    /// count before paging
    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Set an order's status
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

/// Concrete implementation of OrderRepository backed by SeaORM
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_items(&self, order_id: Uuid) -> AppResult<Vec<order_item::Model>> {
        order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Position)
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn assemble(&self, models: Vec<order::Model>) -> AppResult<Vec<Order>> {
        let mut orders = Vec::with_capacity(models.len());
        for model in models {
            let items = self.load_items(model.id).await?;
            orders.push(model.into_order(items));
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_with_items(&self, id: Uuid) -> AppResult<Option<Order>> {
        let Some(model) = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let items = self.load_items(model.id).await?;
        Ok(Some(model.into_order(items)))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query = order::Entity::find().filter(order::Column::UserId.eq(user_id));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = query
            .order_by_asc(order::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let orders = self.assemble(models).await?;
        Ok((orders, total))
    }

    async fn list_all(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut query = order::Entity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = query
            .order_by_desc(order::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(pagination.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let orders = self.assemble(models).await?;
        Ok((orders, total))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        // Conditional update so two concurrent admin calls cannot race
        // one past the terminal check between a read and a write.
        let result = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(status.as_str()))
            .col_expr(order::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(order::Column::Id.eq(id))
            .filter(order::Column::Status.is_not_in([
                OrderStatus::Delivered.as_str(),
                OrderStatus::Cancelled.as_str(),
            ]))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            let existing = order::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(AppError::from)?
                .ok_or(AppError::OrderNotFound(id))?;

            return Err(AppError::validation(format!(
                "Order is {} and can no longer change status",
                existing.status
            )));
        }

        let model = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::OrderNotFound(id))?;

        let items = self.load_items(model.id).await?;
        Ok(model.into_order(items))
    }
}

//! Order service - Atomic order placement and order queries.
//!
//! Placement runs inside a single database transaction. Stock is taken
//! with a conditional decrement (`stock = stock - qty WHERE stock >= qty`),
//! so two orders can never both take the last unit: the decrement either
//! applies in full or the whole order rolls back with nothing written.
//! Transient serialization conflicts are retried a bounded number of
//! times before giving up.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_PLACEMENT_ATTEMPTS;
use crate::domain::{Order, OrderLine, OrderStatus, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::types::PaginationParams;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place an order for the given user, atomically reserving stock
    /// for every line
    async fn place_order(&self, user: &User, lines: Vec<OrderLine>) -> AppResult<Order>;

    /// List the user's own orders in creation order
    async fn list_own_orders(
        &self,
        user: &User,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Fetch one order; customers may only read their own, admins any
    async fn get_order(&self, requester: &User, id: Uuid) -> AppResult<Order>;

    /// List all orders across users, optionally filtered by status
    async fn list_all_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Move an order to a new status; terminal orders cannot change
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

/// True for database errors worth retrying: serialization failures and
/// deadlocks surface as SQLSTATE 40001 / 40P01 on PostgreSQL.
fn is_transient_conflict(err: &AppError) -> bool {
    match err {
        AppError::Database(db_err) => {
            let msg = db_err.to_string();
            msg.contains("40001")
                || msg.contains("40P01")
                || msg.contains("deadlock")
                || msg.contains("serialize")
        }
        _ => false,
    }
}

/// One placement attempt, entirely inside the given transaction.
///
/// Lines are processed in submission order. Any failure rolls back the
/// stock decrements already applied in this attempt.
async fn place_order_in_tx(
    ctx: TransactionContext<'_>,
    user_id: Uuid,
    lines: &[OrderLine],
) -> AppResult<Order> {
    let products = ctx.products();

    let mut total = Decimal::ZERO;
    let mut snapshots = Vec::with_capacity(lines.len());
    let mut reserved_so_far: HashMap<Uuid, i32> = HashMap::new();

    for line in lines {
        let product = products
            .find_by_id(line.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(line.product_id))?;

        let reserved = products.reserve_stock(line.product_id, line.quantity).await?;
        if reserved == 0 {
            // The row was read above, so it exists; stock must have
            // dropped below the requested quantity concurrently. The
            // in-transaction value excludes decrements this attempt
            // already applied (the same product can appear on several
            // lines), and those roll back with the rest, so add them
            // back before reporting availability.
            let in_tx_stock = products
                .current_stock(line.product_id)
                .await?
                .ok_or(AppError::ProductNotFound(line.product_id))?;
            let available =
                in_tx_stock + reserved_so_far.get(&line.product_id).copied().unwrap_or(0);

            return Err(AppError::InsufficientStock {
                product: product.name,
                available,
            });
        }
        *reserved_so_far.entry(line.product_id).or_insert(0) += line.quantity;

        total += product.price * Decimal::from(line.quantity);
        snapshots.push((product, line.quantity));
    }

    let orders = ctx.orders();
    let mut order = orders.insert_order(user_id, total).await?;

    for (position, (product, quantity)) in snapshots.into_iter().enumerate() {
        let item = orders
            .insert_item(
                order.id,
                position as i32,
                product.id,
                product.name,
                quantity,
                product.price,
            )
            .await?;
        order.items.push(item);
    }

    Ok(order)
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    /// Create new order service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn place_order(&self, user: &User, lines: Vec<OrderLine>) -> AppResult<Order> {
        if lines.is_empty() {
            return Err(AppError::EmptyOrder);
        }
        if lines.iter().any(|line| line.quantity < 1) {
            return Err(AppError::InvalidQuantity);
        }

        let user_id = user.id;
        let mut attempt = 1;

        loop {
            // Each attempt gets its own copy so the closure owns the data
            // it moves into the transaction future.
            let attempt_lines = lines.clone();
            let result = self
                .uow
                .transaction(move |ctx| {
                    Box::pin(
                        async move { place_order_in_tx(ctx, user_id, &attempt_lines).await },
                    )
                })
                .await;

            match result {
                Ok(order) => {
                    tracing::info!(
                        order_id = %order.id,
                        user_id = %user_id,
                        total = %order.total,
                        "order placed"
                    );
                    return Ok(order);
                }
                Err(err) if is_transient_conflict(&err) && attempt < MAX_PLACEMENT_ATTEMPTS => {
                    tracing::warn!(
                        user_id = %user_id,
                        attempt,
                        error = %err,
                        "retrying order placement after transient conflict"
                    );
                    attempt += 1;
                }
                Err(err) if is_transient_conflict(&err) => {
                    return Err(AppError::OrderPlacementFailed);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn list_own_orders(
        &self,
        user: &User,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.uow.orders().list_by_user(user.id, pagination).await
    }

    async fn get_order(&self, requester: &User, id: Uuid) -> AppResult<Order> {
        let order = self
            .uow
            .orders()
            .find_with_items(id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        if order.user_id != requester.id && !requester.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(order)
    }

    async fn list_all_orders(
        &self,
        status: Option<OrderStatus>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.uow.orders().list_all(status, pagination).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let order = self
            .uow
            .orders()
            .find_with_items(id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        if order.status.is_terminal() {
            return Err(AppError::validation(format!(
                "Order is {} and can no longer change status",
                order.status
            )));
        }

        self.uow.orders().update_status(id, status).await
    }
}

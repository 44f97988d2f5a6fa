//! Shared test fixtures: repository mocks and an in-memory unit of work.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use rust_decimal::Decimal;
use uuid::Uuid;

use shop_api::domain::{
    Category, CategoryUpdate, NewCategory, NewProduct, Order, OrderStatus, Product,
    ProductFilter, ProductUpdate, User, UserRole,
};
use shop_api::errors::{AppError, AppResult};
use shop_api::infra::{
    CategoryRepository, OrderRepository, ProductRepository, TransactionContext, UnitOfWork,
    UserRepository,
};
use shop_api::types::PaginationParams;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
        async fn create(
            &self,
            email: String,
            password_hash: String,
            full_name: String,
            role: UserRole,
        ) -> AppResult<User>;
        async fn count(&self) -> AppResult<u64>;
    }
}

mock! {
    pub CategoryRepo {}

    #[async_trait]
    impl CategoryRepository for CategoryRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;
        async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;
        async fn list(&self) -> AppResult<Vec<Category>>;
        async fn create(&self, new: NewCategory) -> AppResult<Category>;
        async fn update(&self, id: Uuid, update: CategoryUpdate) -> AppResult<Category>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
        async fn count_products(&self, id: Uuid) -> AppResult<u64>;
    }
}

mock! {
    pub ProductRepo {}

    #[async_trait]
    impl ProductRepository for ProductRepo {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;
        async fn list(
            &self,
            filter: ProductFilter,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Product>, u64)>;
        async fn create(&self, new: NewProduct) -> AppResult<Product>;
        async fn update(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
    }
}

mock! {
    pub OrderRepo {}

    #[async_trait]
    impl OrderRepository for OrderRepo {
        async fn find_with_items(&self, id: Uuid) -> AppResult<Option<Order>>;
        async fn list_by_user(
            &self,
            user_id: Uuid,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Order>, u64)>;
        async fn list_all(
            &self,
            status: Option<OrderStatus>,
            pagination: PaginationParams,
        ) -> AppResult<(Vec<Order>, u64)>;
        async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
    }
}

/// Unit of work over mock repositories. Transactions are not supported;
/// transactional paths are covered by the database-backed tests.
pub struct TestUnitOfWork {
    pub users: Arc<MockUserRepo>,
    pub categories: Arc<MockCategoryRepo>,
    pub products: Arc<MockProductRepo>,
    pub orders: Arc<MockOrderRepo>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepo::new()),
            categories: Arc::new(MockCategoryRepo::new()),
            products: Arc::new(MockProductRepo::new()),
            orders: Arc::new(MockOrderRepo::new()),
        }
    }

    pub fn with_users(mut self, repo: MockUserRepo) -> Self {
        self.users = Arc::new(repo);
        self
    }

    pub fn with_categories(mut self, repo: MockCategoryRepo) -> Self {
        self.categories = Arc::new(repo);
        self
    }

    pub fn with_products(mut self, repo: MockProductRepo) -> Self {
        self.products = Arc::new(repo);
        self
    }

    pub fn with_orders(mut self, repo: MockOrderRepo) -> Self {
        self.orders = Arc::new(repo);
        self
    }
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        full_name: "Test User".to_string(),
        role,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_category(id: Uuid, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_product(id: Uuid, category_id: Uuid, price: Decimal, stock: i32) -> Product {
    Product {
        id,
        name: "Test Product".to_string(),
        description: None,
        price,
        stock,
        category_id,
        image_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_order(id: Uuid, user_id: Uuid, status: OrderStatus) -> Order {
    Order {
        id,
        user_id,
        total: Decimal::new(100_00, 2),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        items: Vec::new(),
    }
}

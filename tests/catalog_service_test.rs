//! Catalog service unit tests.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use rust_decimal_macros::dec;
use uuid::Uuid;

use shop_api::domain::{CategoryUpdate, NewCategory, NewProduct, ProductUpdate};
use shop_api::errors::AppError;
use shop_api::services::{Catalog, CatalogService};

use common::{test_category, test_product, MockCategoryRepo, MockProductRepo, TestUnitOfWork};

fn service(uow: TestUnitOfWork) -> Catalog<TestUnitOfWork> {
    Catalog::new(Arc::new(uow))
}

fn new_product(category_id: Uuid) -> NewProduct {
    NewProduct {
        name: "Widget".to_string(),
        description: None,
        price: dec!(19.90),
        stock: 5,
        category_id,
        image_url: None,
    }
}

#[tokio::test]
async fn create_category_rejects_duplicate_name() {
    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_name()
        .withf(|name| name == "Books")
        .returning(|name| Ok(Some(test_category(Uuid::new_v4(), name))));

    let result = service(TestUnitOfWork::new().with_categories(categories))
        .create_category(NewCategory {
            name: "Books".to_string(),
            description: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_category_succeeds_for_fresh_name() {
    let mut categories = MockCategoryRepo::new();
    categories.expect_find_by_name().returning(|_| Ok(None));
    categories
        .expect_create()
        .returning(|new| Ok(test_category(Uuid::new_v4(), &new.name)));

    let category = service(TestUnitOfWork::new().with_categories(categories))
        .create_category(NewCategory {
            name: "Books".to_string(),
            description: Some("Printed books".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(category.name, "Books");
}

#[tokio::test]
async fn update_category_rejects_empty_payload() {
    let result = service(TestUnitOfWork::new())
        .update_category(
            Uuid::new_v4(),
            CategoryUpdate {
                name: None,
                description: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_category_rejects_rename_onto_taken_name() {
    let id = Uuid::new_v4();
    let other_id = Uuid::new_v4();

    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_name()
        .withf(|name| name == "Books")
        .returning(move |name| Ok(Some(test_category(other_id, name))));

    let result = service(TestUnitOfWork::new().with_categories(categories))
        .update_category(
            id,
            CategoryUpdate {
                name: Some("Books".to_string()),
                description: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_category_allows_rename_to_own_name() {
    let id = Uuid::new_v4();

    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_name()
        .returning(move |name| Ok(Some(test_category(id, name))));
    categories
        .expect_update()
        .returning(|id, update| Ok(test_category(id, update.name.as_deref().unwrap_or("x"))));

    let category = service(TestUnitOfWork::new().with_categories(categories))
        .update_category(
            id,
            CategoryUpdate {
                name: Some("Books".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(category.id, id);
}

#[tokio::test]
async fn delete_category_blocked_while_products_remain() {
    let id = Uuid::new_v4();

    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(test_category(id, "Books"))));
    categories
        .expect_count_products()
        .with(eq(id))
        .returning(|_| Ok(3));

    let result = service(TestUnitOfWork::new().with_categories(categories))
        .delete_category(id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn delete_category_succeeds_when_empty() {
    let id = Uuid::new_v4();

    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_category(id, "Books"))));
    categories.expect_count_products().returning(|_| Ok(0));
    categories.expect_delete().with(eq(id)).returning(|_| Ok(()));

    let result = service(TestUnitOfWork::new().with_categories(categories))
        .delete_category(id)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_missing_category_is_not_found() {
    let mut categories = MockCategoryRepo::new();
    categories.expect_find_by_id().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::new().with_categories(categories))
        .delete_category(Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::CategoryNotFound(_))));
}

#[tokio::test]
async fn create_product_rejects_non_positive_price() {
    let mut request = new_product(Uuid::new_v4());
    request.price = dec!(0.00);

    let result = service(TestUnitOfWork::new()).create_product(request).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_product_rejects_negative_stock() {
    let mut request = new_product(Uuid::new_v4());
    request.stock = -1;

    let result = service(TestUnitOfWork::new()).create_product(request).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_product_requires_existing_category() {
    let mut categories = MockCategoryRepo::new();
    categories.expect_find_by_id().returning(|_| Ok(None));

    let category_id = Uuid::new_v4();
    let result = service(TestUnitOfWork::new().with_categories(categories))
        .create_product(new_product(category_id))
        .await;

    assert!(matches!(result, Err(AppError::CategoryNotFound(id)) if id == category_id));
}

#[tokio::test]
async fn create_product_succeeds() {
    let category_id = Uuid::new_v4();

    let mut categories = MockCategoryRepo::new();
    categories
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_category(id, "Books"))));

    let mut products = MockProductRepo::new();
    products
        .expect_create()
        .returning(|new| Ok(test_product(Uuid::new_v4(), new.category_id, new.price, new.stock)));

    let uow = TestUnitOfWork::new()
        .with_categories(categories)
        .with_products(products);

    let product = service(uow).create_product(new_product(category_id)).await.unwrap();
    assert_eq!(product.category_id, category_id);
    assert_eq!(product.price, dec!(19.90));
}

#[tokio::test]
async fn update_product_rejects_empty_payload() {
    let result = service(TestUnitOfWork::new())
        .update_product(Uuid::new_v4(), ProductUpdate::default())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn get_missing_product_is_not_found() {
    let mut products = MockProductRepo::new();
    products.expect_find_by_id().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::new().with_products(products))
        .get_product(Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::ProductNotFound(_))));
}

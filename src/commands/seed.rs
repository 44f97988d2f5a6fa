//! Seed command - Loads demo users, categories and products.
//!
//! Idempotent: if any user already exists the command does nothing, so
//! it is safe to run on every deploy.

use rust_decimal::Decimal;

use crate::config::Config;
use crate::domain::{NewCategory, NewProduct, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    // price in cents to avoid float literals
    price_cents: i64,
    stock: i32,
    category: &'static str,
}

const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Phones, computers and accessories"),
    ("Clothing", "Apparel for all seasons"),
    ("Books", "Printed and digital books"),
    ("Home", "Furniture and household goods"),
];

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Smartphone X100",
        description: "6.1-inch display, 128 GB storage",
        price_cents: 599_90,
        stock: 25,
        category: "Electronics",
    },
    SeedProduct {
        name: "Laptop Pro 14",
        description: "14-inch laptop with 16 GB RAM",
        price_cents: 1_299_00,
        stock: 10,
        category: "Electronics",
    },
    SeedProduct {
        name: "Wireless Earbuds",
        description: "Noise cancelling, 24h battery",
        price_cents: 89_90,
        stock: 50,
        category: "Electronics",
    },
    SeedProduct {
        name: "Cotton T-Shirt",
        description: "Plain cotton tee, unisex fit",
        price_cents: 19_90,
        stock: 100,
        category: "Clothing",
    },
    SeedProduct {
        name: "Denim Jacket",
        description: "Classic fit denim jacket",
        price_cents: 79_90,
        stock: 30,
        category: "Clothing",
    },
    SeedProduct {
        name: "Running Shoes",
        description: "Lightweight road running shoes",
        price_cents: 119_90,
        stock: 40,
        category: "Clothing",
    },
    SeedProduct {
        name: "The Rust Programming Language",
        description: "Official guide to Rust",
        price_cents: 39_90,
        stock: 60,
        category: "Books",
    },
    SeedProduct {
        name: "Database Internals",
        description: "A deep dive into distributed data systems",
        price_cents: 49_90,
        stock: 35,
        category: "Books",
    },
    SeedProduct {
        name: "Ceramic Mug Set",
        description: "Set of four stoneware mugs",
        price_cents: 29_90,
        stock: 80,
        category: "Home",
    },
    SeedProduct {
        name: "Desk Lamp",
        description: "Adjustable LED desk lamp",
        price_cents: 45_00,
        stock: 45,
        category: "Home",
    },
];

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding database...");

    let db = Database::connect(&config).await;
    let uow = Persistence::new(db.get_connection());

    if uow.users().count().await? > 0 {
        tracing::info!("Database already has users, skipping seed");
        return Ok(());
    }

    let admin_hash = Password::new("admin123")?.into_string();
    uow.users()
        .create(
            "admin@example.com".to_string(),
            admin_hash,
            "Admin".to_string(),
            UserRole::Admin,
        )
        .await?;

    let customer_hash = Password::new("customer123")?.into_string();
    uow.users()
        .create(
            "customer@example.com".to_string(),
            customer_hash,
            "Demo Customer".to_string(),
            UserRole::Customer,
        )
        .await?;

    tracing::info!("Seeded admin@example.com and customer@example.com");

    for (name, description) in SEED_CATEGORIES {
        uow.categories()
            .create(NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
    }

    for seed in SEED_PRODUCTS {
        let category = uow
            .categories()
            .find_by_name(seed.category)
            .await?
            .ok_or_else(|| AppError::internal("seed category missing"))?;

        uow.products()
            .create(NewProduct {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                price: Decimal::new(seed.price_cents, 2),
                stock: seed.stock,
                category_id: category.id,
                image_url: None,
            })
            .await?;
    }

    tracing::info!(
        "Seeded {} categories and {} products",
        SEED_CATEGORIES.len(),
        SEED_PRODUCTS.len()
    );

    Ok(())
}

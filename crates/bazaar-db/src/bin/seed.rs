//! # Seed Data Generator
//!
//! Populates a development database with categories, products, and all
//! three discount kinds.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p bazaar-db --bin seed
//!
//! # Custom product count / database path
//! cargo run -p bazaar-db --bin seed -- --products 200 --db ./data/bazaar.db
//! ```
//!
//! ## Generated Data
//! - Five categories with products spread across them
//! - A 10% category discount on Beverages
//! - A 20% product discount on the first product
//! - Coupons covering every lifecycle state:
//!   - `SAVE30`     30%, 100 uses
//!   - `WELCOME10`  10%, unlimited
//!   - `VIP50`      50%, single use
//!   - `EXPIRED10`  10%, expired yesterday (still active flag!)
//!   - `SOON20`     20%, starts next week

use chrono::{Duration, Utc};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bazaar_core::validation::{validate_coupon_code, validate_discount_bps, validate_max_uses};
use bazaar_core::{Category, CategoryDiscount, CouponDiscount, Product, ProductDiscount};
use bazaar_db::repository::category::generate_category_id;
use bazaar_db::repository::discount::generate_discount_id;
use bazaar_db::repository::product::generate_product_id;
use bazaar_db::{Database, DbConfig};

/// Categories and sample product names for realistic test data
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Cola 330ml",
            "Orange Juice 1L",
            "Sparkling Water",
            "Iced Tea",
            "Cold Brew Coffee",
            "Lemonade",
        ],
    ),
    (
        "Snacks",
        &[
            "Salted Chips",
            "Trail Mix",
            "Dark Chocolate Bar",
            "Granola Bites",
            "Pretzels",
            "Gummy Bears",
        ],
    ),
    (
        "Home",
        &[
            "Scented Candle",
            "Ceramic Mug",
            "Throw Blanket",
            "Desk Organizer",
            "Picture Frame",
        ],
    ),
    (
        "Electronics",
        &[
            "USB-C Cable",
            "Wireless Mouse",
            "Phone Stand",
            "Bluetooth Speaker",
            "Power Bank",
        ],
    ),
    (
        "Outdoors",
        &[
            "Water Bottle",
            "Camping Lantern",
            "Hiking Socks",
            "Dry Bag",
            "Pocket Knife",
        ],
    ),
];

/// Coupons covering every lifecycle state: (code, bps, max_uses, start offset
/// days, expiry offset days, active)
const COUPONS: &[(&str, u32, Option<i64>, Option<i64>, Option<i64>, bool)] = &[
    ("SAVE30", 3000, Some(100), None, Some(30), true),
    ("WELCOME10", 1000, None, None, None, true),
    ("VIP50", 5000, Some(1), None, None, true),
    ("EXPIRED10", 1000, None, None, Some(-1), true),
    ("SOON20", 2000, Some(50), Some(7), Some(37), true),
    ("RETIRED15", 1500, None, None, None, false),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 50;
    let mut db_path = String::from("./bazaar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: seed [--products N] [--db PATH]");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    info!(db = %db_path, products = product_count, "Seeding development database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let categories = seed_categories(&db).await?;
    let products = seed_products(&db, &categories, product_count).await?;
    seed_promotions(&db, &categories, &products).await?;
    seed_coupons(&db).await?;

    info!(
        categories = categories.len(),
        products = products.len(),
        coupons = COUPONS.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Configures tracing output for the seeder.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO level, sqlx noise suppressed
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn seed_categories(db: &Database) -> Result<Vec<Category>, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut categories = Vec::with_capacity(CATALOG.len());

    for (name, _) in CATALOG {
        let category = Category {
            id: generate_category_id(),
            name: name.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.categories().insert(&category).await?;
        categories.push(category);
    }

    Ok(categories)
}

async fn seed_products(
    db: &Database,
    categories: &[Category],
    count: usize,
) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let mut products = Vec::with_capacity(count);

    for index in 0..count {
        let (category_index, names) = {
            let slot = index % CATALOG.len();
            (slot, CATALOG[slot].1)
        };
        let name = names[index / CATALOG.len() % names.len()];
        let category = &categories[category_index];

        // Deterministic pseudo-variety: $0.99 .. $59.99
        let price_cents = 99 + ((index as i64 * 731) % 5_900);

        let product = Product {
            id: generate_product_id(),
            category_id: category.id.clone(),
            sku: format!("{}-{:04}", category.name[..3].to_ascii_uppercase(), index),
            name: format!("{name} #{index}"),
            description: None,
            price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        products.push(product);
    }

    Ok(products)
}

async fn seed_promotions(
    db: &Database,
    categories: &[Category],
    products: &[Product],
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();

    // 10% off everything in Beverages for the next two weeks
    if let Some(beverages) = categories.first() {
        let discount = CategoryDiscount {
            id: generate_discount_id(),
            category_id: beverages.id.clone(),
            discount_bps: 1000,
            starts_at: Some(now),
            ends_at: Some(now + Duration::days(14)),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        validate_discount_bps(discount.discount_bps)?;
        db.discounts().insert_category_discount(&discount).await?;
    }

    // 20% off the first product, open-ended
    if let Some(product) = products.first() {
        let discount = ProductDiscount {
            id: generate_discount_id(),
            product_id: product.id.clone(),
            discount_bps: 2000,
            starts_at: None,
            ends_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        validate_discount_bps(discount.discount_bps)?;
        db.discounts().insert_product_discount(&discount).await?;
    }

    Ok(())
}

async fn seed_coupons(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();

    for &(code, bps, max_uses, start_days, expiry_days, is_active) in COUPONS {
        let code = validate_coupon_code(code)?;
        validate_discount_bps(bps)?;
        validate_max_uses(max_uses)?;

        let coupon = CouponDiscount {
            id: generate_discount_id(),
            code,
            discount_bps: bps,
            max_uses,
            starts_at: start_days.map(|d| now + Duration::days(d)),
            expires_at: expiry_days.map(|d| now + Duration::days(d)),
            is_active,
            created_at: now,
            updated_at: now,
        };
        db.discounts().insert_coupon(&coupon).await?;
    }

    Ok(())
}

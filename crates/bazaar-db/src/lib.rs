//! # bazaar-db: Database Layer for Bazaar Commerce
//!
//! This crate provides database access for the Bazaar Commerce pricing
//! subsystem. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bazaar Commerce Data Flow                           │
//! │                                                                         │
//! │  Resource layer (submit_order endpoint)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bazaar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Checkout   │  │   │
//! │  │   │   (pool.rs)   │    │  discount.rs  │    │ (checkout.rs)│  │   │
//! │  │   │               │    │  usage.rs     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  product.rs   │◄───│ price_order  │  │   │
//! │  │   │ Migrations    │    │  order.rs     │    │ create_order │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys ON)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (discounts, usage, ...)
//! - [`checkout`] - The order pricing orchestrator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("path/to/bazaar.db")).await?;
//!
//! // Quote a cart line
//! let line = db.checkout().price_line(&product_id, 2, Some("SAVE30"), now).await?;
//!
//! // Submit an order (strict pricing + atomic coupon consumption)
//! let order = db.checkout().submit_order(&user_id, &lines, Some("SAVE30")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutError, CheckoutResult, CheckoutService};
pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::discount::DiscountRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::usage::{RecordUse, UsageLedger};

// =============================================================================
// Test Utilities
// =============================================================================

/// Shared helpers for the in-crate test suites: an in-memory database plus
/// seeders for the handful of entities nearly every test needs.
#[cfg(test)]
pub(crate) mod testutil {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::pool::{Database, DbConfig};
    use crate::repository::category::generate_category_id;
    use crate::repository::discount::generate_discount_id;
    use crate::repository::product::generate_product_id;
    use bazaar_core::{Category, CategoryDiscount, CouponDiscount, Product, ProductDiscount};

    /// Fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// A random principal id, UUID-shaped like the auth layer issues them.
    pub fn test_user_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub async fn seed_category(db: &Database, name: &str) -> Category {
        let now = Utc::now();
        let category = Category {
            id: generate_category_id(),
            name: name.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.categories().insert(&category).await.unwrap();
        category
    }

    pub async fn seed_product(
        db: &Database,
        category_id: &str,
        sku: &str,
        price_cents: i64,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            category_id: category_id.to_string(),
            sku: sku.to_string(),
            name: format!("Test {sku}"),
            description: None,
            price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    pub async fn seed_coupon(
        db: &Database,
        code: &str,
        discount_bps: u32,
        max_uses: Option<i64>,
    ) -> CouponDiscount {
        let now = Utc::now();
        let coupon = CouponDiscount {
            id: generate_discount_id(),
            code: code.to_string(),
            discount_bps,
            max_uses,
            starts_at: None,
            expires_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.discounts().insert_coupon(&coupon).await.unwrap();
        coupon
    }

    pub async fn seed_product_discount(
        db: &Database,
        product_id: &str,
        discount_bps: u32,
        is_active: bool,
    ) -> ProductDiscount {
        let now = Utc::now();
        let discount = ProductDiscount {
            id: generate_discount_id(),
            product_id: product_id.to_string(),
            discount_bps,
            starts_at: None,
            ends_at: None,
            is_active,
            created_at: now,
            updated_at: now,
        };
        db.discounts()
            .insert_product_discount(&discount)
            .await
            .unwrap();
        discount
    }

    pub async fn seed_category_discount(
        db: &Database,
        category_id: &str,
        discount_bps: u32,
        is_active: bool,
    ) -> CategoryDiscount {
        let now = Utc::now();
        let discount = CategoryDiscount {
            id: generate_discount_id(),
            category_id: category_id.to_string(),
            discount_bps,
            starts_at: None,
            ends_at: None,
            is_active,
            created_at: now,
            updated_at: now,
        };
        db.discounts()
            .insert_category_discount(&discount)
            .await
            .unwrap();
        discount
    }
}

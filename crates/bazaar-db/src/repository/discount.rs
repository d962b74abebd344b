//! # Discount Catalog Repository
//!
//! Read and admin-write operations for the three discount kinds.
//!
//! ## Catalog Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discount Catalog                                   │
//! │                                                                         │
//! │  READS (pricing path, no side effects):                                │
//! │  ├── find_coupon(code)              → Option<CouponDiscount>           │
//! │  ├── find_product_discounts(id)     → Vec<ProductDiscount>             │
//! │  └── find_category_discounts(id)    → Vec<CategoryDiscount>            │
//! │                                                                         │
//! │  The find_* sequences return ALL rows, NOT filtered by validity:       │
//! │  validity is evaluated in bazaar-core at one reference instant.        │
//! │  Empty results are values, never errors.                               │
//! │                                                                         │
//! │  WRITES (admin path):                                                  │
//! │  ├── insert/update/deactivate coupon   (soft delete only - usage       │
//! │  │                                      rows reference coupons)        │
//! │  ├── insert/update/delete product discount                             │
//! │  └── insert/update/delete category discount                            │
//! │                                                                         │
//! │  Percent-in-range and window validation happen at this boundary via   │
//! │  bazaar_core::validation, before records reach the pricing core.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::validation::normalize_coupon_code;
use bazaar_core::{CategoryDiscount, CouponDiscount, ProductDiscount};

const COUPON_COLUMNS: &str = "id, code, discount_bps, max_uses, starts_at, expires_at, \
     is_active, created_at, updated_at";

/// Repository for the discount catalog.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    // =========================================================================
    // Coupon Reads
    // =========================================================================

    /// Finds a coupon by its code.
    ///
    /// The code is normalized (trim + ASCII uppercase) before the lookup,
    /// so `save30` finds `SAVE30`. A miss is `Ok(None)`, never an error:
    /// callers above this layer decide whether that means "no coupon"
    /// (quote) or `InvalidCoupon` (strict).
    pub async fn find_coupon(&self, code: &str) -> DbResult<Option<CouponDiscount>> {
        let code = normalize_coupon_code(code);

        let query = format!("SELECT {COUPON_COLUMNS} FROM coupon_discounts WHERE code = ?1");
        let coupon = sqlx::query_as::<_, CouponDiscount>(&query)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(coupon)
    }

    /// Gets a coupon by its ID.
    pub async fn get_coupon_by_id(&self, id: &str) -> DbResult<Option<CouponDiscount>> {
        let query = format!("SELECT {COUPON_COLUMNS} FROM coupon_discounts WHERE id = ?1");
        let coupon = sqlx::query_as::<_, CouponDiscount>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(coupon)
    }

    // =========================================================================
    // Standing Promotion Reads
    // =========================================================================

    /// All product discounts for a product - unfiltered by validity.
    pub async fn find_product_discounts(&self, product_id: &str) -> DbResult<Vec<ProductDiscount>> {
        let discounts = sqlx::query_as::<_, ProductDiscount>(
            "SELECT id, product_id, discount_bps, starts_at, ends_at, \
                    is_active, created_at, updated_at \
             FROM product_discounts WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(discounts)
    }

    /// All category discounts for a category - unfiltered by validity.
    pub async fn find_category_discounts(
        &self,
        category_id: &str,
    ) -> DbResult<Vec<CategoryDiscount>> {
        let discounts = sqlx::query_as::<_, CategoryDiscount>(
            "SELECT id, category_id, discount_bps, starts_at, ends_at, \
                    is_active, created_at, updated_at \
             FROM category_discounts WHERE category_id = ?1",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(discounts)
    }

    // =========================================================================
    // Coupon Writes (admin)
    // =========================================================================

    /// Inserts a new coupon.
    ///
    /// The stored code is the normalized form; uniqueness is therefore
    /// effectively case-insensitive.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert_coupon(&self, coupon: &CouponDiscount) -> DbResult<()> {
        let code = normalize_coupon_code(&coupon.code);
        debug!(code = %code, "Inserting coupon");

        sqlx::query(
            "INSERT INTO coupon_discounts (
                id, code, discount_bps, max_uses, starts_at, expires_at,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&coupon.id)
        .bind(&code)
        .bind(coupon.discount_bps)
        .bind(coupon.max_uses)
        .bind(coupon.starts_at)
        .bind(coupon.expires_at)
        .bind(coupon.is_active)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing coupon.
    pub async fn update_coupon(&self, coupon: &CouponDiscount) -> DbResult<()> {
        let code = normalize_coupon_code(&coupon.code);
        debug!(id = %coupon.id, "Updating coupon");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE coupon_discounts SET
                code = ?2,
                discount_bps = ?3,
                max_uses = ?4,
                starts_at = ?5,
                expires_at = ?6,
                is_active = ?7,
                updated_at = ?8
             WHERE id = ?1",
        )
        .bind(&coupon.id)
        .bind(&code)
        .bind(coupon.discount_bps)
        .bind(coupon.max_uses)
        .bind(coupon.starts_at)
        .bind(coupon.expires_at)
        .bind(coupon.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", &coupon.id));
        }

        Ok(())
    }

    /// Disables a coupon (soft delete).
    ///
    /// ## Why Soft Delete?
    /// Usage records and historical orders reference the coupon; disabling
    /// preserves their pricing while making the code unredeemable.
    pub async fn deactivate_coupon(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating coupon");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE coupon_discounts SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", id));
        }

        Ok(())
    }

    // =========================================================================
    // Product Discount Writes (admin)
    // =========================================================================

    /// Inserts a new product discount.
    pub async fn insert_product_discount(&self, discount: &ProductDiscount) -> DbResult<()> {
        debug!(product_id = %discount.product_id, "Inserting product discount");

        sqlx::query(
            "INSERT INTO product_discounts (
                id, product_id, discount_bps, starts_at, ends_at,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&discount.id)
        .bind(&discount.product_id)
        .bind(discount.discount_bps)
        .bind(discount.starts_at)
        .bind(discount.ends_at)
        .bind(discount.is_active)
        .bind(discount.created_at)
        .bind(discount.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product discount.
    pub async fn update_product_discount(&self, discount: &ProductDiscount) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE product_discounts SET
                discount_bps = ?2,
                starts_at = ?3,
                ends_at = ?4,
                is_active = ?5,
                updated_at = ?6
             WHERE id = ?1",
        )
        .bind(&discount.id)
        .bind(discount.discount_bps)
        .bind(discount.starts_at)
        .bind(discount.ends_at)
        .bind(discount.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product discount", &discount.id));
        }

        Ok(())
    }

    /// Deletes a product discount.
    ///
    /// Hard delete is fine here: nothing references standing promotions,
    /// order items only record which source won.
    pub async fn delete_product_discount(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM product_discounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product discount", id));
        }

        Ok(())
    }

    // =========================================================================
    // Category Discount Writes (admin)
    // =========================================================================

    /// Inserts a new category discount.
    pub async fn insert_category_discount(&self, discount: &CategoryDiscount) -> DbResult<()> {
        debug!(category_id = %discount.category_id, "Inserting category discount");

        sqlx::query(
            "INSERT INTO category_discounts (
                id, category_id, discount_bps, starts_at, ends_at,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&discount.id)
        .bind(&discount.category_id)
        .bind(discount.discount_bps)
        .bind(discount.starts_at)
        .bind(discount.ends_at)
        .bind(discount.is_active)
        .bind(discount.created_at)
        .bind(discount.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing category discount.
    pub async fn update_category_discount(&self, discount: &CategoryDiscount) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE category_discounts SET
                discount_bps = ?2,
                starts_at = ?3,
                ends_at = ?4,
                is_active = ?5,
                updated_at = ?6
             WHERE id = ?1",
        )
        .bind(&discount.id)
        .bind(discount.discount_bps)
        .bind(discount.starts_at)
        .bind(discount.ends_at)
        .bind(discount.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category discount", &discount.id));
        }

        Ok(())
    }

    /// Deletes a category discount.
    pub async fn delete_category_discount(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM category_discounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category discount", id));
        }

        Ok(())
    }
}

/// Helper to generate a new discount ID (any kind).
pub fn generate_discount_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        seed_category, seed_category_discount, seed_coupon, seed_product, seed_product_discount,
        test_db,
    };

    #[tokio::test]
    async fn test_find_coupon_is_case_insensitive() {
        let db = test_db().await;
        seed_coupon(&db, "SAVE30", 3000, Some(100)).await;

        let found = db.discounts().find_coupon("save30").await.unwrap().unwrap();
        assert_eq!(found.code, "SAVE30");

        let found = db
            .discounts()
            .find_coupon("  Save30 ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.discount_bps, 3000);

        assert!(db.discounts().find_coupon("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected_across_case() {
        let db = test_db().await;
        let mut coupon = seed_coupon(&db, "SAVE30", 3000, None).await;

        coupon.id = generate_discount_id();
        coupon.code = "save30".to_string();
        let err = db.discounts().insert_coupon(&coupon).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_find_discounts_returns_all_rows_unfiltered() {
        let db = test_db().await;
        let category = seed_category(&db, "Beverages").await;
        let product = seed_product(&db, &category.id, "COLA-330", 199).await;

        seed_product_discount(&db, &product.id, 2000, true).await;
        seed_product_discount(&db, &product.id, 1000, false).await; // inactive
        seed_category_discount(&db, &category.id, 500, true).await;

        // Validity filtering is the core's job - the catalog returns rows as-is.
        let product_rows = db
            .discounts()
            .find_product_discounts(&product.id)
            .await
            .unwrap();
        assert_eq!(product_rows.len(), 2);

        let category_rows = db
            .discounts()
            .find_category_discounts(&category.id)
            .await
            .unwrap();
        assert_eq!(category_rows.len(), 1);

        // Nothing configured: empty sequence, not an error
        assert!(db
            .discounts()
            .find_product_discounts("missing")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_coupon_update_and_deactivate() {
        let db = test_db().await;
        let mut coupon = seed_coupon(&db, "SAVE30", 3000, Some(10)).await;

        coupon.discount_bps = 2500;
        coupon.max_uses = Some(5);
        db.discounts().update_coupon(&coupon).await.unwrap();

        let found = db.discounts().find_coupon("SAVE30").await.unwrap().unwrap();
        assert_eq!(found.discount_bps, 2500);
        assert_eq!(found.max_uses, Some(5));

        db.discounts().deactivate_coupon(&coupon.id).await.unwrap();
        let found = db.discounts().find_coupon("SAVE30").await.unwrap().unwrap();
        assert!(!found.is_active);
    }

    #[tokio::test]
    async fn test_delete_standing_promotions() {
        let db = test_db().await;
        let category = seed_category(&db, "Beverages").await;
        let product = seed_product(&db, &category.id, "COLA-330", 199).await;
        let pd = seed_product_discount(&db, &product.id, 2000, true).await;
        let cd = seed_category_discount(&db, &category.id, 500, true).await;

        db.discounts().delete_product_discount(&pd.id).await.unwrap();
        db.discounts()
            .delete_category_discount(&cd.id)
            .await
            .unwrap();

        assert!(db
            .discounts()
            .find_product_discounts(&product.id)
            .await
            .unwrap()
            .is_empty());
        assert!(db
            .discounts()
            .find_category_discounts(&category.id)
            .await
            .unwrap()
            .is_empty());
    }
}

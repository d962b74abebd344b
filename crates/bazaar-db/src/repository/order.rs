//! # Order Repository
//!
//! Database operations for orders and order items.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order creation is ONE transaction, driven by the checkout service:    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. (if coupon) conditional INSERT INTO discount_usage          │   │
//! │  │     → zero rows = race lost = whole transaction aborts          │   │
//! │  │                                                                 │   │
//! │  │  2. INSERT INTO orders (totals, coupon_id)                      │   │
//! │  │                                                                 │   │
//! │  │  3. INSERT INTO order_items (FINAL unit prices + snapshots)     │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← All succeed or none do; no partial order ever exists         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The insert helpers here therefore take a caller-supplied connection;
//! only the reads run against the pool directly.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use bazaar_core::{Order, OrderItem};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, coupon_id, subtotal_cents, discount_cents, \
                    total_cents, created_at \
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items for an order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, sku_snapshot, name_snapshot, \
                    quantity, unit_base_price_cents, unit_discount_cents, \
                    unit_price_cents, discount_source, created_at \
             FROM order_items WHERE order_id = ?1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, coupon_id, subtotal_cents, discount_cents, \
                    total_cents, created_at \
             FROM orders WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts all orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts an order on a caller-supplied connection.
    ///
    /// Part of the order-creation transaction; never call against the pool
    /// outside one.
    pub async fn insert_order_in(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, total = order.total_cents, "Inserting order");

        sqlx::query(
            "INSERT INTO orders (
                id, user_id, coupon_id, subtotal_cents, discount_cents,
                total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.coupon_id)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts an order item on a caller-supplied connection.
    ///
    /// ## Snapshot Pattern
    /// sku/name/prices were frozen into the item when the line was priced;
    /// later catalog edits do not touch persisted orders.
    pub async fn insert_item_in(conn: &mut SqliteConnection, item: &OrderItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO order_items (
                id, order_id, product_id, sku_snapshot, name_snapshot,
                quantity, unit_base_price_cents, unit_discount_cents,
                unit_price_cents, discount_source, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(&item.sku_snapshot)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_base_price_cents)
        .bind(item.unit_discount_cents)
        .bind(item.unit_price_cents)
        .bind(item.discount_source)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new order item ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_category, seed_product, test_db};
    use bazaar_core::DiscountSource;
    use chrono::Utc;

    #[tokio::test]
    async fn test_order_round_trip() {
        let db = test_db().await;
        let category = seed_category(&db, "Beverages").await;
        let product = seed_product(&db, &category.id, "COLA-330", 199).await;

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(),
            user_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            coupon_id: None,
            subtotal_cents: 398,
            discount_cents: 0,
            total_cents: 398,
            created_at: now,
        };
        let item = OrderItem {
            id: generate_order_item_id(),
            order_id: order.id.clone(),
            product_id: product.id.clone(),
            sku_snapshot: product.sku.clone(),
            name_snapshot: product.name.clone(),
            quantity: 2,
            unit_base_price_cents: 199,
            unit_discount_cents: 0,
            unit_price_cents: 199,
            discount_source: DiscountSource::None,
            created_at: now,
        };

        let mut conn = db.pool().acquire().await.unwrap();
        OrderRepository::insert_order_in(&mut conn, &order).await.unwrap();
        OrderRepository::insert_item_in(&mut conn, &item).await.unwrap();
        drop(conn);

        let found = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(found.total_cents, 398);

        let items = db.orders().get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].discount_source, DiscountSource::None);
        assert_eq!(items[0].line_total().cents(), 398);

        let mine = db.orders().list_for_user(&order.user_id).await.unwrap();
        assert_eq!(mine.len(), 1);
    }
}

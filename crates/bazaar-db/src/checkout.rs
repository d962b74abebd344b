//! # Checkout Service
//!
//! The order pricing orchestrator: fetches discount candidates, prices
//! every line against ONE reference instant, and turns the result into a
//! persisted order with at-most-once coupon consumption.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Flow                                     │
//! │                                                                         │
//! │  price_order (STRICT, read-only, idempotent)                           │
//! │  ├── capture ONE reference instant for the whole order                 │
//! │  ├── fetch coupon by code + its ledger count (once, not per line)      │
//! │  ├── per line: fetch product (live category_id!) + discount rows       │
//! │  │             resolve via bazaar_core::pricing at that instant        │
//! │  └── assemble PricedOrder (+ ONE pending usage fact if the coupon      │
//! │      was applied - the same coupon across many lines counts once)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_order (ONE transaction)                                        │
//! │  ├── conditional usage INSERT ── race lost? ──► rollback +             │
//! │  │                                              CouponExhausted        │
//! │  ├── INSERT order                                                      │
//! │  ├── INSERT order_items (final unit prices + snapshots)                │
//! │  └── COMMIT                                                            │
//! │                                                                         │
//! │  price_line (QUOTE) - lenient preview pricing for carts: a missing     │
//! │  or invalid coupon silently falls back so a price can always be shown  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Idempotence Contract
//! `price_order` has no side effects and may be retried freely. The first
//! observable side effect is the usage insert inside `create_order`, so a
//! caller must discard a priced result once it has been submitted.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::order::{generate_order_id, generate_order_item_id, OrderRepository};
use crate::repository::usage::{generate_usage_id, RecordUse, UsageLedger};
use bazaar_core::validation::{validate_order_size, validate_uuid};
use bazaar_core::{
    resolve_line, CouponCandidate, CouponDiscount, CouponRejection, DiscountUsageRecord,
    LineCandidates, LineRequest, Order, OrderItem, PricedLine, PricedOrder, PricingError,
    PricingMode, Product,
};

// =============================================================================
// Checkout Error
// =============================================================================

/// Errors surfaced by the checkout service.
///
/// Pricing failures (`InvalidCoupon`, `CouponExhausted`, ...) and storage
/// failures stay distinguishable so the resource layer can map them to
/// different responses.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Checkout Service
// =============================================================================

/// Prices carts and orders, and persists orders atomically.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Prices a single line in quote mode (cart preview).
    ///
    /// A coupon code that is unknown or not currently valid is silently
    /// ignored here; standing promotions still apply. No side effects.
    pub async fn price_line(
        &self,
        product_id: &str,
        quantity: i64,
        coupon_code: Option<&str>,
        at: DateTime<Utc>,
    ) -> CheckoutResult<PricedLine> {
        let product = self.fetch_sellable_product(product_id).await?;
        let coupon = self.fetch_coupon_with_count(coupon_code).await?;

        self.resolve_one(&product, quantity, coupon.as_ref(), at, PricingMode::Quote)
            .await
    }

    /// Prices a whole order in strict mode (order submission).
    ///
    /// Every line shares the same reference instant `at`, so a discount
    /// cannot flip validity mid-calculation. The coupon is fetched and its
    /// ledger count read ONCE for the whole order.
    ///
    /// Read-only: the returned [`PricedOrder`] carries at most one pending
    /// usage fact for [`CheckoutService::create_order`] to commit.
    pub async fn price_order(
        &self,
        user_id: &str,
        lines: &[LineRequest],
        coupon_code: Option<&str>,
        at: DateTime<Utc>,
    ) -> CheckoutResult<PricedOrder> {
        validate_uuid(user_id).map_err(PricingError::from)?;
        validate_order_size(lines.len()).map_err(PricingError::from)?;

        debug!(
            user_id = %user_id,
            line_count = lines.len(),
            coupon = coupon_code.unwrap_or("-"),
            "Pricing order"
        );

        // Strict mode: a code that resolves to nothing is an error here,
        // because only this layer sees the lookup miss.
        let coupon = match coupon_code {
            Some(code) => match self.fetch_coupon_with_count(Some(code)).await? {
                Some(found) => Some(found),
                None => {
                    return Err(PricingError::InvalidCoupon {
                        code: bazaar_core::validation::normalize_coupon_code(code),
                        reason: CouponRejection::UnknownCode,
                    }
                    .into())
                }
            },
            None => None,
        };

        let mut priced_lines = Vec::with_capacity(lines.len());
        for request in lines {
            let product = self.fetch_sellable_product(&request.product_id).await?;
            let line = self
                .resolve_one(
                    &product,
                    request.quantity,
                    coupon.as_ref(),
                    at,
                    PricingMode::Strict,
                )
                .await?;
            priced_lines.push(line);
        }

        let mut priced = PricedOrder::from_lines(priced_lines, at);

        // At most ONE usage fact per order: the same coupon applied to
        // several lines is still consumed once.
        if priced.coupon_applied() {
            if let Some((coupon, _)) = &coupon {
                priced.coupon_id = Some(coupon.id.clone());
                priced.coupon_code = Some(coupon.code.clone());
                priced.coupon_usage = Some(DiscountUsageRecord {
                    id: generate_usage_id(),
                    coupon_id: coupon.id.clone(),
                    user_id: user_id.to_string(),
                    used_at: at,
                });
            }
        }

        Ok(priced)
    }

    /// Persists a priced order in a single transaction.
    ///
    /// The pending usage fact (if any) is committed through the ledger's
    /// conditional insert FIRST: losing the race for the coupon's last
    /// slot rolls the whole transaction back and surfaces
    /// [`PricingError::CouponExhausted`] - no partial state is kept, and
    /// the caller must re-quote.
    pub async fn create_order(
        &self,
        user_id: &str,
        priced: &PricedOrder,
    ) -> CheckoutResult<Order> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        if let Some(usage) = &priced.coupon_usage {
            match UsageLedger::record_use_in(&mut tx, usage).await? {
                RecordUse::Recorded(_) => {}
                RecordUse::AlreadyExhausted => {
                    // A concurrent order consumed the last slot between our
                    // validity read and now.
                    tx.rollback().await.map_err(DbError::from)?;
                    let code = priced
                        .coupon_code
                        .clone()
                        .unwrap_or_else(|| usage.coupon_id.clone());
                    info!(code = %code, "Coupon race lost at commit time");
                    return Err(PricingError::CouponExhausted { code }.into());
                }
            }
        }

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(),
            user_id: user_id.to_string(),
            coupon_id: priced.coupon_id.clone(),
            subtotal_cents: priced.subtotal_cents,
            discount_cents: priced.discount_cents,
            total_cents: priced.total_cents,
            created_at: now,
        };
        OrderRepository::insert_order_in(&mut tx, &order).await?;

        for line in &priced.lines {
            let item = OrderItem {
                id: generate_order_item_id(),
                order_id: order.id.clone(),
                product_id: line.product_id.clone(),
                sku_snapshot: line.sku_snapshot.clone(),
                name_snapshot: line.name_snapshot.clone(),
                quantity: line.quantity,
                unit_base_price_cents: line.unit_base_price_cents,
                unit_discount_cents: line.unit_discount_cents,
                // The FINAL discounted unit price - what the customer pays.
                unit_price_cents: line.unit_final_price_cents,
                discount_source: line.discount_source,
                created_at: now,
            };
            OrderRepository::insert_item_in(&mut tx, &item).await?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order.id,
            total = %order.total(),
            coupon = order.coupon_id.as_deref().unwrap_or("-"),
            "Order created"
        );

        Ok(order)
    }

    /// Prices and persists an order in one call.
    ///
    /// Captures the reference instant ONCE, prices strictly, then commits.
    /// On [`PricingError::CouponExhausted`] the caller should re-quote
    /// without the coupon.
    pub async fn submit_order(
        &self,
        user_id: &str,
        lines: &[LineRequest],
        coupon_code: Option<&str>,
    ) -> CheckoutResult<Order> {
        let reference_time = Utc::now();
        let priced = self
            .price_order(user_id, lines, coupon_code, reference_time)
            .await?;
        self.create_order(user_id, &priced).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Fetches a product that may appear on an order line.
    ///
    /// A missing or soft-deleted product is `ProductNotFound` in every
    /// mode: there is no price to show for something that is not sold.
    async fn fetch_sellable_product(&self, product_id: &str) -> CheckoutResult<Product> {
        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| PricingError::ProductNotFound(product_id.to_string()))?;

        Ok(product)
    }

    /// Fetches the coupon for a code together with its current ledger
    /// count. `None` when no code was supplied or the code is unknown.
    async fn fetch_coupon_with_count(
        &self,
        coupon_code: Option<&str>,
    ) -> CheckoutResult<Option<(CouponDiscount, i64)>> {
        let Some(code) = coupon_code else {
            return Ok(None);
        };

        match self.db.discounts().find_coupon(code).await? {
            Some(coupon) => {
                let used_count = self.db.usage().count_uses(&coupon.id).await?;
                Ok(Some((coupon, used_count)))
            }
            None => Ok(None),
        }
    }

    /// Fetches the standing-promotion candidates for one product and
    /// resolves the line in the requested mode.
    async fn resolve_one(
        &self,
        product: &Product,
        quantity: i64,
        coupon: Option<&(CouponDiscount, i64)>,
        at: DateTime<Utc>,
        mode: PricingMode,
    ) -> CheckoutResult<PricedLine> {
        let discounts = self.db.discounts();
        let product_discounts = discounts.find_product_discounts(&product.id).await?;
        // The LIVE category assignment decides which category discounts
        // are even candidates.
        let category_discounts = discounts
            .find_category_discounts(&product.category_id)
            .await?;

        let candidates = LineCandidates {
            product_discounts: &product_discounts,
            category_discounts: &category_discounts,
            coupon: coupon.map(|(coupon, used_count)| CouponCandidate {
                coupon,
                used_count: *used_count,
            }),
        };

        let line = resolve_line(product, quantity, &candidates, at, mode)?;
        Ok(line)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        seed_category, seed_category_discount, seed_coupon, seed_product, seed_product_discount,
        test_db, test_user_id,
    };
    use bazaar_core::DiscountSource;
    use chrono::Duration;

    #[tokio::test]
    async fn test_coupon_wins_end_to_end() {
        // Base $100.00, category 10%, product 20%, coupon SAVE30 30%, qty 2:
        // coupon wins, unit $70.00, line total $140.00.
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        seed_category_discount(&db, &category.id, 1000, true).await;
        seed_product_discount(&db, &product.id, 2000, true).await;
        let coupon = seed_coupon(&db, "SAVE30", 3000, Some(100)).await;

        let user = test_user_id();
        let lines = [LineRequest::new(&product.id, 2)];
        let priced = db
            .checkout()
            .price_order(&user, &lines, Some("save30"), Utc::now())
            .await
            .unwrap();

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].discount_source, DiscountSource::Coupon);
        assert_eq!(priced.lines[0].unit_final_price_cents, 7_000);
        assert_eq!(priced.total_cents, 14_000);
        assert_eq!(priced.coupon_id.as_deref(), Some(coupon.id.as_str()));
        assert!(priced.coupon_usage.is_some());

        // Pricing alone recorded nothing.
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 0);

        let order = db.checkout().create_order(&user, &priced).await.unwrap();
        assert_eq!(order.total_cents, 14_000);
        assert_eq!(order.discount_cents, 6_000);

        // order_items carry the FINAL unit price, and exactly one usage
        // fact was committed with the order.
        let items = db.orders().get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price_cents, 7_000);
        assert_eq!(items[0].unit_base_price_cents, 10_000);
        assert_eq!(items[0].discount_source, DiscountSource::Coupon);
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_product_discount_without_coupon() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        seed_category_discount(&db, &category.id, 1000, true).await;
        seed_product_discount(&db, &product.id, 2000, true).await;

        let priced = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 1)],
                None,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(priced.lines[0].discount_source, DiscountSource::Product);
        assert_eq!(priced.lines[0].unit_final_price_cents, 8_000);
        assert!(priced.coupon_usage.is_none());
    }

    #[tokio::test]
    async fn test_no_discounts_no_coupon() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 4_200).await;

        let priced = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 3)],
                None,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(priced.lines[0].discount_source, DiscountSource::None);
        assert_eq!(
            priced.lines[0].unit_final_price_cents,
            priced.lines[0].unit_base_price_cents
        );
        assert_eq!(priced.total_cents, 12_600);
        assert_eq!(priced.discount_cents, 0);
    }

    #[tokio::test]
    async fn test_unknown_coupon_strict_vs_quote() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;

        // Strict: unknown code is InvalidCoupon.
        let err = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 1)],
                Some("NOPE"),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Pricing(PricingError::InvalidCoupon {
                reason: CouponRejection::UnknownCode,
                ..
            })
        ));

        // Quote: the same code silently prices without a discount.
        let line = db
            .checkout()
            .price_line(&product.id, 1, Some("NOPE"), Utc::now())
            .await
            .unwrap();
        assert_eq!(line.discount_source, DiscountSource::None);
        assert_eq!(line.unit_final_price_cents, 10_000);
    }

    #[tokio::test]
    async fn test_expired_coupon_is_invalid_in_strict_mode() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;

        let mut coupon = seed_coupon(&db, "EXPIRED10", 1000, None).await;
        coupon.expires_at = Some(Utc::now() - Duration::days(1));
        db.discounts().update_coupon(&coupon).await.unwrap();

        let err = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 1)],
                Some("EXPIRED10"),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Pricing(PricingError::InvalidCoupon {
                reason: CouponRejection::Expired,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_window_discount_is_ignored() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;

        // starts_at after ends_at: bad historical data, never applies.
        let mut discount = seed_product_discount(&db, &product.id, 5000, true).await;
        discount.starts_at = Some(Utc::now() + Duration::days(1));
        discount.ends_at = Some(Utc::now() - Duration::days(1));
        db.discounts()
            .update_product_discount(&discount)
            .await
            .unwrap();

        let priced = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 1)],
                None,
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(priced.lines[0].discount_source, DiscountSource::None);
    }

    #[tokio::test]
    async fn test_inactive_product_is_not_sellable() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        db.products().soft_delete(&product.id).await.unwrap();

        let err = db
            .checkout()
            .price_order(
                &test_user_id(),
                &[LineRequest::new(&product.id, 1)],
                None,
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Pricing(PricingError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pricing_twice_has_no_side_effects() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        let coupon = seed_coupon(&db, "SAVE30", 3000, Some(1)).await;

        let user = test_user_id();
        let lines = [LineRequest::new(&product.id, 1)];
        let at = Utc::now();

        let first = db
            .checkout()
            .price_order(&user, &lines, Some("SAVE30"), at)
            .await
            .unwrap();
        let second = db
            .checkout()
            .price_order(&user, &lines, Some("SAVE30"), at)
            .await
            .unwrap();

        assert_eq!(first.lines, second.lines);
        assert_eq!(first.total_cents, second.total_cents);
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_one_usage_fact_for_multi_line_orders() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product_a = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        let product_b = seed_product(&db, &category.id, "WIDGET-2", 5_000).await;
        let coupon = seed_coupon(&db, "SAVE30", 3000, Some(10)).await;

        let user = test_user_id();
        let lines = [
            LineRequest::new(&product_a.id, 1),
            LineRequest::new(&product_b.id, 2),
        ];
        let order = db
            .checkout()
            .submit_order(&user, &lines, Some("SAVE30"))
            .await
            .unwrap();

        // Both lines got the coupon, but it was consumed ONCE.
        let items = db.orders().get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items
            .iter()
            .all(|i| i.discount_source == DiscountSource::Coupon));
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 1);
        // $100 → $70, plus 2 × ($50 → $35)
        assert_eq!(order.total_cents, 7_000 + 2 * 3_500);
    }

    #[tokio::test]
    async fn test_racing_orders_for_the_last_coupon_slot() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        let coupon = seed_coupon(&db, "VIP50", 5000, Some(1)).await;

        let user_a = test_user_id();
        let user_b = test_user_id();
        let checkout_a = db.checkout();
        let checkout_b = db.checkout();
        let lines_a = [LineRequest::new(&product.id, 1)];
        let lines_b = [LineRequest::new(&product.id, 1)];

        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                checkout_a
                    .submit_order(&user_a, &lines_a, Some("VIP50"))
                    .await
            }),
            tokio::spawn(async move {
                checkout_b
                    .submit_order(&user_b, &lines_b, Some("VIP50"))
                    .await
            }),
        );

        let results = [a.unwrap(), b.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let exhausted = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(CheckoutError::Pricing(
                        PricingError::CouponExhausted { .. }
                            | PricingError::InvalidCoupon {
                                reason: CouponRejection::Exhausted,
                                ..
                            }
                    ))
                )
            })
            .count();

        // Exactly one order got the coupon; the loser saw the exhaustion
        // either at validity-read time or at commit time, depending on the
        // interleaving - never both winning.
        assert_eq!(wins, 1);
        assert_eq!(exhausted, 1);
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 1);
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_time_race_keeps_no_partial_state() {
        let db = test_db().await;
        let category = seed_category(&db, "Gadgets").await;
        let product = seed_product(&db, &category.id, "WIDGET-1", 10_000).await;
        let coupon = seed_coupon(&db, "VIP50", 5000, Some(1)).await;

        let user_a = test_user_id();
        let user_b = test_user_id();
        let at = Utc::now();
        let lines = [LineRequest::new(&product.id, 1)];

        // Both price while headroom remains...
        let priced_a = db
            .checkout()
            .price_order(&user_a, &lines, Some("VIP50"), at)
            .await
            .unwrap();
        let priced_b = db
            .checkout()
            .price_order(&user_b, &lines, Some("VIP50"), at)
            .await
            .unwrap();

        // ...but only the first commit claims the slot.
        db.checkout().create_order(&user_a, &priced_a).await.unwrap();
        let err = db
            .checkout()
            .create_order(&user_b, &priced_b)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Pricing(PricingError::CouponExhausted { .. })
        ));

        // The losing attempt left nothing behind: no order, no items,
        // no usage row.
        assert_eq!(db.orders().count().await.unwrap(), 1);
        assert!(db.orders().list_for_user(&user_b).await.unwrap().is_empty());
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let db = test_db().await;

        let err = db
            .checkout()
            .price_order(&test_user_id(), &[], None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Pricing(PricingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_category_move_changes_discount() {
        let db = test_db().await;
        let cheap = seed_category(&db, "Clearance").await;
        let full = seed_category(&db, "Full Price").await;
        let mut product = seed_product(&db, &full.id, "WIDGET-1", 10_000).await;
        seed_category_discount(&db, &cheap.id, 4000, true).await;

        // In its original category: no discount.
        let line = db
            .checkout()
            .price_line(&product.id, 1, None, Utc::now())
            .await
            .unwrap();
        assert_eq!(line.discount_source, DiscountSource::None);

        // Re-categorized: the clearance discount applies because pricing
        // reads the LIVE category_id.
        product.category_id = cheap.id.clone();
        db.products().update(&product).await.unwrap();

        let line = db
            .checkout()
            .price_line(&product.id, 1, None, Utc::now())
            .await
            .unwrap();
        assert_eq!(line.discount_source, DiscountSource::Category);
        assert_eq!(line.unit_final_price_cents, 6_000);
    }
}

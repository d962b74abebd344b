//! # Price Resolution
//!
//! Pure discount resolution and price calculation for order lines.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      resolve_line                                       │
//! │                                                                         │
//! │  Candidates (fetched by the caller, unfiltered):                       │
//! │    • all ProductDiscount rows for product.id                           │
//! │    • all CategoryDiscount rows for product.category_id (LIVE)          │
//! │    • the CouponDiscount for the supplied code + its ledger count       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Filter through validity at ONE reference instant                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tie-break: coupon > product > category                                │
//! │  (a coupon is an explicit user action and must never be silently       │
//! │   shadowed by a standing promotion; within one source the largest      │
//! │   percentage wins)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedLine { base, discount, final, source }                          │
//! │                                                                         │
//! │  NO SIDE EFFECTS: pricing never records usage. Recording is the        │
//! │  orchestrator's job, exactly once per order, because the same coupon   │
//! │  may apply to several lines but is consumed once.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modes
//! - `Quote`: a missing or invalid coupon silently falls back to
//!   no-coupon so a price can always be shown (cart preview).
//! - `Strict`: the same situation is an [`PricingError::InvalidCoupon`]
//!   (order submission).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CouponRejection, PricingError, PricingResult};
use crate::money::Money;
use crate::types::{
    CategoryDiscount, CouponDiscount, CouponState, DiscountPercent, DiscountSource,
    DiscountUsageRecord, Product, ProductDiscount,
};
use crate::validation::validate_quantity;

// =============================================================================
// Pricing Mode
// =============================================================================

/// How strictly coupon problems are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// Preview pricing: coupon problems fall back to no-discount.
    Quote,
    /// Order-submission pricing: coupon problems are errors.
    Strict,
}

// =============================================================================
// Candidates
// =============================================================================

/// A coupon candidate paired with its current ledger count.
///
/// The count is read once by the caller (before pricing the first line)
/// so every line of an order sees the same headroom.
#[derive(Debug, Clone, Copy)]
pub struct CouponCandidate<'a> {
    pub coupon: &'a CouponDiscount,
    pub used_count: i64,
}

/// The unfiltered discount candidates for one line.
///
/// Validity filtering happens inside [`resolve_line`]; callers fetch ALL
/// rows for the product and its live category.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCandidates<'a> {
    pub product_discounts: &'a [ProductDiscount],
    pub category_discounts: &'a [CategoryDiscount],
    pub coupon: Option<CouponCandidate<'a>>,
}

// =============================================================================
// Priced Line
// =============================================================================

/// The resolved pricing result for one order line.
///
/// Embedded into order-item creation; sku/name are snapshotted here so the
/// persisted order survives later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub sku_snapshot: String,
    pub name_snapshot: String,
    pub quantity: i64,
    /// Unit price before any discount.
    pub unit_base_price_cents: i64,
    /// Per-unit discount amount (base − final).
    pub unit_discount_cents: i64,
    /// FINAL unit price after the winning discount.
    pub unit_final_price_cents: i64,
    /// Which source won the tie-break, or `None`.
    pub discount_source: DiscountSource,
}

impl PricedLine {
    /// Returns the unit base price as Money.
    #[inline]
    pub fn unit_base_price(&self) -> Money {
        Money::from_cents(self.unit_base_price_cents)
    }

    /// Returns the final unit price as Money.
    #[inline]
    pub fn unit_final_price(&self) -> Money {
        Money::from_cents(self.unit_final_price_cents)
    }

    /// Returns the line total (final unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_final_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Priced Order
// =============================================================================

/// The resolved pricing result for a whole order.
///
/// Consumed by the order-persistence layer, which writes the final unit
/// prices into `order_items` and - when `coupon_usage` is present - commits
/// that usage fact atomically with the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    /// Sum of unit base price × quantity over all lines.
    pub subtotal_cents: i64,
    /// subtotal − total.
    pub discount_cents: i64,
    /// Sum of unit final price × quantity over all lines.
    pub total_cents: i64,
    /// The single instant every line was priced against.
    pub reference_time: DateTime<Utc>,
    /// The coupon that was applied, if any.
    pub coupon_id: Option<String>,
    /// The (normalized) code of the applied coupon, for messages.
    pub coupon_code: Option<String>,
    /// The pending usage fact the order-creation transaction must persist.
    /// At most one per order: the same coupon across several lines is
    /// consumed once.
    pub coupon_usage: Option<DiscountUsageRecord>,
}

impl PricedOrder {
    /// Assembles a priced order from its lines, computing the totals.
    ///
    /// Coupon bookkeeping fields start empty; the orchestrator fills them
    /// in when a coupon was actually applied.
    pub fn from_lines(lines: Vec<PricedLine>, reference_time: DateTime<Utc>) -> Self {
        let subtotal_cents: i64 = lines
            .iter()
            .map(|l| l.unit_base_price_cents * l.quantity)
            .sum();
        let total_cents: i64 = lines
            .iter()
            .map(|l| l.unit_final_price_cents * l.quantity)
            .sum();

        PricedOrder {
            lines,
            subtotal_cents,
            discount_cents: subtotal_cents - total_cents,
            total_cents,
            reference_time,
            coupon_id: None,
            coupon_code: None,
            coupon_usage: None,
        }
    }

    /// True if any line applied the coupon.
    pub fn coupon_applied(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.discount_source == DiscountSource::Coupon)
    }

    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Line Resolution
// =============================================================================

/// Resolves the discounts for one line and computes its final price.
///
/// Pure and deterministic: identical inputs with the same `at` always
/// yield the identical `PricedLine`, and nothing is recorded anywhere.
///
/// ## Errors
/// - `Validation` if the quantity is out of bounds
/// - `InvalidCoupon` in `Strict` mode when the coupon candidate is not
///   currently applicable (the unknown-code case is the caller's, since
///   only the caller sees the lookup miss)
pub fn resolve_line(
    product: &Product,
    quantity: i64,
    candidates: &LineCandidates<'_>,
    at: DateTime<Utc>,
    mode: PricingMode,
) -> PricingResult<PricedLine> {
    validate_quantity(quantity)?;

    let mut winner: Option<(DiscountPercent, DiscountSource)> = None;

    // Coupon first: an explicit user action outranks standing promotions.
    if let Some(candidate) = &candidates.coupon {
        let state = candidate.coupon.state_at(at, candidate.used_count);
        if state == CouponState::Active {
            winner = Some((candidate.coupon.percent(), DiscountSource::Coupon));
        } else if mode == PricingMode::Strict {
            let reason = match state {
                CouponState::Pending => CouponRejection::NotStarted,
                CouponState::Expired => CouponRejection::Expired,
                CouponState::Exhausted => CouponRejection::Exhausted,
                _ => CouponRejection::Inactive,
            };
            return Err(PricingError::InvalidCoupon {
                code: candidate.coupon.code.clone(),
                reason,
            });
        }
        // Quote mode: fall through to the standing promotions.
    }

    // Product discount: more specific than category.
    if winner.is_none() {
        winner = candidates
            .product_discounts
            .iter()
            .filter(|d| d.is_valid_at(at))
            .max_by_key(|d| d.discount_bps)
            .map(|d| (d.percent(), DiscountSource::Product));
    }

    // Category discount: resolved against the product's LIVE category.
    if winner.is_none() {
        winner = candidates
            .category_discounts
            .iter()
            .filter(|d| d.is_valid_at(at))
            .max_by_key(|d| d.discount_bps)
            .map(|d| (d.percent(), DiscountSource::Category));
    }

    let base = product.price();
    let (final_price, source) = match winner {
        Some((percent, source)) => (base.apply_discount(percent), source),
        None => (base, DiscountSource::None),
    };

    Ok(PricedLine {
        product_id: product.id.clone(),
        sku_snapshot: product.sku.clone(),
        name_snapshot: product.name.clone(),
        quantity,
        unit_base_price_cents: base.cents(),
        unit_discount_cents: (base - final_price).cents(),
        unit_final_price_cents: final_price.cents(),
        discount_source: source,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

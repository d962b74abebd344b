//! # Domain Types
//!
//! Core domain types for Bazaar Commerce.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ CouponDiscount  │   │ProductDiscount  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │CategoryDiscount │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  ─────────────  │       │
//! │  │  sku (business) │   │  code (business)│   │  id (UUID)      │       │
//! │  │  category_id    │   │  discount_bps   │   │  discount_bps   │       │
//! │  │  price_cents    │   │  max_uses       │   │  starts/ends_at │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DiscountPercent │   │ DiscountSource  │   │   CouponState   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  None           │   │  Pending        │       │
//! │  │  3000 = 30%     │   │  Coupon         │   │  Active         │       │
//! │  └─────────────────┘   │  Product        │   │  Exhausted      │       │
//! │                        │  Category       │   │  Expired        │       │
//! │                        └─────────────────┘   │  Disabled       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (sku, coupon code) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Discount Percent
// =============================================================================

/// Discount percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 3000 bps = 30% (e.g., a "SAVE30" coupon)
/// Integer bps keep discount math exact; floats never enter the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscountPercent(u32);

impl DiscountPercent {
    /// Creates a discount from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountPercent(bps)
    }

    /// Creates a discount from a percentage (for convenience).
    pub fn from_percent(pct: f64) -> Self {
        DiscountPercent((pct * 100.0).round() as u32)
    }

    /// Returns the discount in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the discount as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountPercent(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountPercent {
    fn default() -> Self {
        DiscountPercent::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Category discounts attach here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Whether the category is active (soft delete).
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The product's LIVE category. Category discounts are always resolved
    /// against this field at pricing time, never against a stored snapshot.
    pub category_id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in listings and frozen into order items.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Base price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Coupon Discount
// =============================================================================

/// A user-entered, code-based discount with a global usage cap.
///
/// ## Lifecycle
/// Created and edited by administrators. Never hard-deleted while usage
/// records reference it: disabling via `is_active = false` preserves
/// historical order pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CouponDiscount {
    pub id: String,

    /// Unique redemption code, stored uppercase. Lookups normalize
    /// (trim + ASCII-uppercase) before querying, so `save30` finds `SAVE30`.
    pub code: String,

    /// Discount in basis points (3000 = 30%).
    pub discount_bps: u32,

    /// Global usage cap. `None` means unlimited.
    /// The ledger guarantees the recorded-use count never exceeds this.
    pub max_uses: Option<i64>,

    /// Start of the redemption window. `None` means already started.
    pub starts_at: Option<DateTime<Utc>>,

    /// End of the redemption window. `None` means never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the coupon is enabled (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CouponDiscount {
    /// Returns the discount percentage.
    #[inline]
    pub fn percent(&self) -> DiscountPercent {
        DiscountPercent::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Product / Category Discounts
// =============================================================================

/// A standing, automatically-applied promotion scoped to one product.
///
/// `None` `starts_at` means "already started"; `None` `ends_at` means
/// "never ends".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductDiscount {
    pub id: String,
    pub product_id: String,
    pub discount_bps: u32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDiscount {
    #[inline]
    pub fn percent(&self) -> DiscountPercent {
        DiscountPercent::from_bps(self.discount_bps)
    }
}

/// A standing, automatically-applied promotion scoped to one category.
/// Same window shape as [`ProductDiscount`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryDiscount {
    pub id: String,
    pub category_id: String,
    pub discount_bps: u32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryDiscount {
    #[inline]
    pub fn percent(&self) -> DiscountPercent {
        DiscountPercent::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Discount Usage Record
// =============================================================================

/// An immutable fact: one row per successful coupon application.
///
/// The count of rows for a coupon must never exceed that coupon's
/// `max_uses`; the usage ledger's conditional insert enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DiscountUsageRecord {
    pub id: String,
    pub coupon_id: String,
    pub user_id: String,
    pub used_at: DateTime<Utc>,
}

// =============================================================================
// Discount Source
// =============================================================================

/// Which discount source won the tie-break for a priced line.
///
/// At most one discount is ever applied per line - discounts do not stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    /// No valid discount applied; final price equals base price.
    None,
    /// A coupon code won (explicit user action, highest precedence).
    Coupon,
    /// A product-level standing promotion won.
    Product,
    /// A category-level standing promotion won.
    Category,
}

impl Default for DiscountSource {
    fn default() -> Self {
        DiscountSource::None
    }
}

// =============================================================================
// Coupon State
// =============================================================================

/// The lifecycle state of a coupon at a reference instant.
///
/// ## State Machine (computed on read, never stored)
/// ```text
/// Pending ──► Active ──► Exhausted (headroom = 0)
///                  └────► Expired   (past expires_at)
///   any state ──────────► Disabled  (is_active = false)
/// ```
/// `Exhausted` and `Expired` are absorbing for pricing purposes: there is
/// no forward transition back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponState {
    /// `starts_at` is in the future.
    Pending,
    /// Within window, enabled, headroom > 0.
    Active,
    /// No usage headroom remains.
    Exhausted,
    /// Past `expires_at` (or the window is malformed).
    Expired,
    /// `is_active` is false.
    Disabled,
}

// =============================================================================
// Line Request
// =============================================================================

/// One requested order line: which product, how many.
/// The inbound shape of the pricing operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Order / Order Item
// =============================================================================

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// The coupon consumed by this order, if any.
    pub coupon_id: Option<String>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a persisted order.
/// Uses snapshot pattern to freeze pricing data at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at order time (frozen).
    pub sku_snapshot: String,
    /// Product name at order time (frozen).
    pub name_snapshot: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price before discount, at order time (frozen).
    pub unit_base_price_cents: i64,
    /// Per-unit discount amount.
    pub unit_discount_cents: i64,
    /// FINAL discounted unit price - this is what the customer pays.
    pub unit_price_cents: i64,
    /// Which discount source produced the final price.
    pub discount_source: DiscountSource,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the final unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (final unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

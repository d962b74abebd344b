//! # bazaar-core: Pure Business Logic for Bazaar Commerce
//!
//! This crate is the **heart** of the Bazaar Commerce pricing subsystem. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Bazaar Commerce Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Resource Layer (HTTP endpoints, out of scope)        │   │
//! │  │    quote_cart ──► submit_order ──► admin discount CRUD          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validity  │  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │  windows  │  │ resolve_  │  │   │
//! │  │   │  Coupon   │  │ discounts │  │  headroom │  │   line    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bazaar-db (Database Layer)                   │   │
//! │  │        SQLite repositories, usage ledger, checkout service      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CouponDiscount, Order, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`validity`] - Discount window / activity / headroom evaluation
//! - [`pricing`] - Discount resolution and price calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Pricing is deterministic - same inputs and same
//!    reference instant = same output, with no side effects
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64), all
//!    percentages in basis points (u32)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::money::Money;
//! use bazaar_core::types::DiscountPercent;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(10_000); // $100.00
//!
//! // A 30% coupon brings it to $70.00
//! let discounted = price.apply_discount(DiscountPercent::from_bps(3000));
//! assert_eq!(discounted.cents(), 7_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod validity;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bazaar_core::Money` instead of
// `use bazaar_core::money::Money`

pub use error::{CouponRejection, PricingError, PricingResult, ValidationError};
pub use money::Money;
pub use pricing::{
    resolve_line, CouponCandidate, LineCandidates, PricedLine, PricedOrder, PricingMode,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single order
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
/// Can be made configurable per-tenant in future versions.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

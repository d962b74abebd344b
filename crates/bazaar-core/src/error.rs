//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── PricingError     - Pricing / coupon resolution failures           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bazaar-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → resource layer → client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (coupon code, product id)
//! 3. Errors are enum variants, never String
//! 4. "No discount applies" is a VALUE, not an error - only strict-mode
//!    coupon rejection and commit-time exhaustion are errors

use thiserror::Error;

// =============================================================================
// Coupon Rejection
// =============================================================================

/// Why a coupon was rejected in strict mode.
///
/// "Not found" and "not currently valid" both collapse into
/// [`PricingError::InvalidCoupon`]; this enum preserves the distinction so
/// the resource layer can word the user-facing message differently without
/// widening the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// No coupon exists for the supplied code.
    #[error("unknown code")]
    UnknownCode,

    /// The coupon exists but is disabled.
    #[error("no longer active")]
    Inactive,

    /// The coupon's redemption window has not opened yet.
    #[error("not yet redeemable")]
    NotStarted,

    /// The coupon's redemption window has closed.
    #[error("expired")]
    Expired,

    /// The coupon's usage cap was already reached when we looked.
    #[error("usage limit reached")]
    Exhausted,
}

// =============================================================================
// Pricing Error
// =============================================================================

/// Pricing and discount resolution errors.
///
/// These surface from strict-mode pricing (order submission). Preview/quote
/// pricing falls back to "no discount" instead of returning the coupon
/// variants, so a price can always be shown.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A requested line references a product that does not exist or is
    /// no longer sold.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Coupon supplied but not applicable (strict mode only).
    ///
    /// ## When This Occurs
    /// - Code does not exist
    /// - Coupon disabled, outside its window, or exhausted at read time
    ///
    /// Surfaced to the end user as "this code cannot be applied."
    #[error("Coupon '{code}' cannot be applied: {reason}")]
    InvalidCoupon {
        code: String,
        reason: CouponRejection,
    },

    /// The race for the coupon's last usage slot was lost at commit time.
    ///
    /// ## When This Occurs
    /// A concurrent order consumed the final slot between our validity
    /// read and the atomic usage insert. The whole order attempt fails;
    /// no partial state is kept. The caller must re-quote.
    #[error("Coupon '{code}' was just used up, retry without it")]
    CouponExhausted { code: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur at the admin/checkout boundary, before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid timestamp).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

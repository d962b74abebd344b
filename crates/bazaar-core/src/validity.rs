//! # Validity Evaluation
//!
//! Pure functions deciding whether a discount record is applicable at a
//! reference instant.
//!
//! ## Validity Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A discount is valid at instant t iff                                   │
//! │                                                                         │
//! │    is_active                                                            │
//! │    AND (starts_at is NULL OR starts_at ≤ t)                             │
//! │    AND (ends_at   is NULL OR t ≤ ends_at)                               │
//! │    AND (coupons only) usage headroom > 0                                │
//! │                                                                         │
//! │  A malformed window (starts_at AFTER ends_at) is ALWAYS INVALID.        │
//! │  Such rows can pre-exist from direct edits; they are bad historical     │
//! │  data, not caller error, so they disable the discount instead of        │
//! │  raising.                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reference instant is captured once per pricing call and threaded
//! through, so a discount cannot flip validity partway through an order.

use chrono::{DateTime, Utc};

use crate::types::{CategoryDiscount, CouponDiscount, CouponState, ProductDiscount};

// =============================================================================
// Window Evaluation
// =============================================================================

/// Checks whether a `[starts_at, ends_at]` window contains the instant `at`.
///
/// Both ends are inclusive and both are optional: a `None` start means
/// "already started", a `None` end means "never ends". A window whose start
/// lies after its end never contains anything.
pub fn window_contains(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> bool {
    if let (Some(starts), Some(ends)) = (starts_at, ends_at) {
        if starts > ends {
            return false;
        }
    }
    if let Some(starts) = starts_at {
        if at < starts {
            return false;
        }
    }
    if let Some(ends) = ends_at {
        if at > ends {
            return false;
        }
    }
    true
}

// =============================================================================
// Per-Kind Validity
// =============================================================================

impl ProductDiscount {
    /// True if this product discount may be applied at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && window_contains(self.starts_at, self.ends_at, at)
    }
}

impl CategoryDiscount {
    /// True if this category discount may be applied at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && window_contains(self.starts_at, self.ends_at, at)
    }
}

impl CouponDiscount {
    /// Remaining uses before the cap is reached, or `None` if unlimited.
    ///
    /// Clamped at zero: a ledger count above `max_uses` (impossible under
    /// the ledger's guard, but conceivable from direct edits) still reads
    /// as "no headroom" rather than going negative.
    pub fn headroom(&self, used_count: i64) -> Option<i64> {
        self.max_uses.map(|max| (max - used_count).max(0))
    }

    /// Computes the coupon's lifecycle state at `at`.
    ///
    /// `used_count` is the ledger's current count for this coupon; states
    /// are computed on read, never stored.
    pub fn state_at(&self, at: DateTime<Utc>, used_count: i64) -> CouponState {
        if !self.is_active {
            return CouponState::Disabled;
        }
        if let (Some(starts), Some(expires)) = (self.starts_at, self.expires_at) {
            // Malformed window: never redeemable, absorbing like Expired.
            if starts > expires {
                return CouponState::Expired;
            }
        }
        if let Some(starts) = self.starts_at {
            if at < starts {
                return CouponState::Pending;
            }
        }
        if let Some(expires) = self.expires_at {
            if at > expires {
                return CouponState::Expired;
            }
        }
        if self.headroom(used_count) == Some(0) {
            return CouponState::Exhausted;
        }
        CouponState::Active
    }

    /// True if this coupon may be applied at `at` given the ledger count.
    pub fn is_valid_at(&self, at: DateTime<Utc>, used_count: i64) -> bool {
        self.state_at(at, used_count) == CouponState::Active
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

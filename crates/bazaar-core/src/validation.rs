//! # Validation Module
//!
//! Input validation for the admin and checkout boundaries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Resource layer (HTTP endpoints, out of scope here)           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Percent in [0, 100], quantities positive, codes well-formed       │
//! │  └── ISO-8601 window parsing, window ordering                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on discount_bps / max_uses                      │
//! │  ├── UNIQUE constraints (sku, coupon code)                             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: records that reach the pricing core are assumed     │
//! │  well-formed EXCEPT for discount windows, which validity evaluation    │
//! │  re-checks defensively (bad historical data may pre-exist).            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Coupon Codes
// =============================================================================

/// Normalizes a coupon code: trim + ASCII uppercase.
///
/// Applied at every boundary that touches a code (admin insert, catalog
/// lookup), so `save30` finds `SAVE30` and uniqueness is effectively
/// case-insensitive.
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Validates a coupon code and returns its normalized form.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 40 characters
/// - Only letters, digits, hyphens, and underscores
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_coupon_code;
///
/// assert_eq!(validate_coupon_code(" save30 ").unwrap(), "SAVE30");
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("HAS SPACE").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = normalize_coupon_code(code);

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 40,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_discount_bps;
///
/// assert!(validate_discount_bps(3000).is_ok());  // 30%
/// assert!(validate_discount_bps(10000).is_ok()); // 100%
/// assert!(validate_discount_bps(10001).is_err());
/// ```
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates a usage cap.
///
/// `None` (unlimited) is always valid; a cap must be non-negative.
pub fn validate_max_uses(max_uses: Option<i64>) -> ValidationResult<()> {
    if let Some(max) = max_uses {
        if max < 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_uses".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of lines in one order.
///
/// ## Rules
/// - At least one line
/// - Must not exceed MAX_ORDER_LINES (100)
pub fn validate_order_size(line_count: usize) -> ValidationResult<()> {
    if line_count == 0 {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    if line_count > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Window Validators
// =============================================================================

/// Parses an ISO-8601 / RFC 3339 timestamp for a discount window field.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::parse_window_timestamp;
///
/// assert!(parse_window_timestamp("2026-03-01T00:00:00Z").is_ok());
/// assert!(parse_window_timestamp("03/01/2026").is_err());
/// ```
pub fn parse_window_timestamp(value: &str) -> ValidationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ValidationError::InvalidFormat {
            field: "timestamp".to_string(),
            reason: e.to_string(),
        })
}

/// Validates that a discount window is well-ordered.
///
/// New records must not be created with `starts_at` after `ends_at`. Note
/// that validity evaluation still treats such windows as never-valid when
/// they pre-exist in the database - this validator only guards the admin
/// write path.
pub fn validate_window(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> ValidationResult<()> {
    if let (Some(starts), Some(ends)) = (starts_at, ends_at) {
        if starts > ends {
            return Err(ValidationError::InvalidFormat {
                field: "window".to_string(),
                reason: "starts_at must not be after ends_at".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// Used for principal and entity ids crossing the checkout boundary.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

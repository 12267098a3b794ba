//! # Validation Module
//!
//! Input validation for caller-supplied data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Storefront                                                │
//! │  ├── Basic format checks (empty code, quantity widgets)             │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (before resolution)                           │
//! │  ├── Malformed cart items degrade to full price, never crash        │
//! │  └── Malformed coupon codes are rejected without a catalog trip     │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Catalog constraints (owned by the persistence layer)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::CartItem;
use crate::MAX_COUPON_CODE_LEN;

/// Validates a coupon code's shape before any catalog lookup.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 50 characters
///
/// ## Example
/// ```rust
/// use market_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("SPRING20").is_ok());
/// assert!(validate_coupon_code("   ").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (>= 1)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a whole cart item.
///
/// Resolution treats a failure here as "no discount, full price" rather
/// than an error; a malformed item must never take the cart down.
pub fn validate_cart_item(item: &CartItem) -> ValidationResult<()> {
    validate_unit_price_cents(item.unit_price_cents)?;
    validate_quantity(item.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

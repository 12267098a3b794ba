//! # Coupon Validation
//!
//! Validates one explicitly entered coupon code against one cart item.
//!
//! ## Validation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  code ──► lookup ──► active? ──► code-type? ──► in window?          │
//! │                                                      │              │
//! │                                                      ▼              │
//! │            product eligible? ──► usage caps? ──► candidate          │
//! │                                                                     │
//! │  Any failed step returns None - absence, not an error. Codes that   │
//! │  don't pan out for an item are silently dropped; user-visible       │
//! │  feedback belongs to the public validator on the service.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use market_core::DiscountCandidate;

use crate::catalog::{ApplicationType, CatalogReader, CouponRecord};
use crate::error::CatalogResult;

/// Checks a coupon's usage caps for a given user.
///
/// The total cap comes straight off the record; the per-user count needs a
/// catalog trip, which is skipped when the coupon has no per-user limit.
pub(crate) async fn usage_allows<C: CatalogReader>(
    catalog: &C,
    record: &CouponRecord,
    user_id: i64,
) -> CatalogResult<bool> {
    if record.usage.total_exhausted() {
        return Ok(false);
    }

    if record.usage.per_user_limit.is_some() {
        let user_used = catalog.user_coupon_usage(record.id, user_id).await?;
        return Ok(record.usage.allows_user(user_used));
    }

    Ok(true)
}

/// Validates explicit coupon codes for a single cart item.
pub(crate) struct CouponValidator<'a, C> {
    catalog: &'a C,
}

impl<'a, C: CatalogReader> CouponValidator<'a, C> {
    pub(crate) fn new(catalog: &'a C) -> Self {
        CouponValidator { catalog }
    }

    /// Resolves a code into a candidate for this item, or `None` when the
    /// code is unknown, inactive, out of window, not an explicit-code
    /// coupon, scoped to other products, or over a usage cap.
    pub(crate) async fn validate_for_item(
        &self,
        code: &str,
        product_id: i64,
        vendor_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> CatalogResult<Option<DiscountCandidate>> {
        let Some(record) = self.catalog.coupon_by_code(code.trim()).await? else {
            return Ok(None);
        };

        if !record.is_active
            || record.application != ApplicationType::CouponCode
            || !record.in_window(now)
        {
            return Ok(None);
        }

        if !record.applies_to(product_id, vendor_id) {
            return Ok(None);
        }

        if !usage_allows(self.catalog, &record, user_id).await? {
            return Ok(None);
        }

        Ok(Some(record.to_candidate()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

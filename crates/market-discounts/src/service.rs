//! # Discount Resolution Service
//!
//! The façade checkout calls. One entry point resolves the best discount
//! for every item in a cart; a second gives user-facing feedback on a
//! typed-in coupon code before checkout.
//!
//! ## Resolution Pipeline (per item)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  CartItem ──► gather candidates ──► pick best ──► commission guard  │
//! │                     │                   │               │           │
//! │                     │ none              │ none          │ vetoed    │
//! │                     ▼                   ▼               ▼           │
//! │                full price          full price      Excluded         │
//! │                                                         │           │
//! │                                                    ok   ▼           │
//! │                                         allocate cost ► Applied     │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items resolve concurrently and independently: a veto or a catalog
//! failure on one item never disturbs another. Every failure path degrades
//! to full price, never to an unverified discount.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use market_core::{
    allocation::allocate_cost,
    commission::{check_commission_safety, COMMISSION_EXCLUSION_REASON},
    selection::best_candidate,
    validation::{validate_cart_item, validate_coupon_code},
    CartItem, CommissionStructure, CouponType, DiscountDetails, DiscountResult, DiscountValue,
};

use crate::catalog::{CatalogReader, CouponRecord};
use crate::coupon;
use crate::gather::gather_candidates;

// =============================================================================
// Public Coupon Validation Types
// =============================================================================

/// The coupon summary returned to the storefront when a code checks out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSummary {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub value: DiscountValue,
    pub coupon_type: CouponType,
}

impl From<&CouponRecord> for CouponSummary {
    fn from(record: &CouponRecord) -> Self {
        CouponSummary {
            id: record.id,
            code: record.code.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            value: record.value,
            coupon_type: record.coupon_type,
        }
    }
}

/// Why a typed-in code was turned down, in storefront language.
///
/// A rejection is normal traffic, not a fault; the Display strings are the
/// exact messages the storefront shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("Coupon code not found or inactive")]
    NotFound,
    #[error("Coupon is not yet active")]
    NotYetActive,
    #[error("Coupon has expired")]
    Expired,
    #[error("Coupon usage limit exceeded")]
    UsageLimitExceeded,
    #[error("Coupon does not apply to any items in your cart")]
    NotApplicable,
    #[error("Failed to validate coupon code")]
    LookupFailed,
}

/// Outcome of validating a typed-in coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CouponValidation {
    fn valid(summary: CouponSummary) -> Self {
        CouponValidation {
            valid: true,
            coupon: Some(summary),
            error: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        CouponValidation {
            valid: false,
            coupon: None,
            error: Some(message.into()),
        }
    }

    fn rejected(rejection: CouponRejection) -> Self {
        CouponValidation::invalid(rejection.to_string())
    }
}

// =============================================================================
// Discount Service
// =============================================================================

/// Discount resolution over a catalog.
///
/// Generic over the catalog so callers can wire in their storage adapter in
/// production and an in-memory fixture in tests.
///
/// ## Example
/// ```rust,ignore
/// let service = DiscountService::new(catalog);
/// let results = service.resolve_discounts(items, user_id, &codes).await;
/// ```
pub struct DiscountService<C> {
    catalog: C,
}

impl<C: CatalogReader> DiscountService<C> {
    /// Creates a service over the given catalog.
    pub fn new(catalog: C) -> Self {
        DiscountService { catalog }
    }

    /// Resolves the best discount for every item in a cart.
    ///
    /// Returns one result per input item, in input order. Pure read: call
    /// it as often as the storefront repaints the cart. All items share a
    /// single `now` so a validity window cannot flip mid-cart.
    pub async fn resolve_discounts(
        &self,
        items: Vec<CartItem>,
        user_id: i64,
        coupon_codes: &[String],
    ) -> Vec<DiscountResult> {
        let now = Utc::now();

        info!(
            items = items.len(),
            codes = coupon_codes.len(),
            user_id,
            "Resolving cart discounts"
        );

        let results = join_all(
            items
                .into_iter()
                .map(|item| self.resolve_item(item, user_id, coupon_codes, now)),
        )
        .await;

        info!(
            applied = results.iter().filter(|r| r.discount_applied()).count(),
            excluded = results.iter().filter(|r| r.is_excluded()).count(),
            "Cart discounts resolved"
        );

        results
    }

    /// Resolves one item: gather, pick, guard, allocate.
    async fn resolve_item(
        &self,
        item: CartItem,
        user_id: i64,
        coupon_codes: &[String],
        now: DateTime<Utc>,
    ) -> DiscountResult {
        if let Err(err) = validate_cart_item(&item) {
            warn!(product_id = item.product_id, error = %err, "Malformed cart item, keeping full price");
            return DiscountResult::full_price(item);
        }

        let candidates = gather_candidates(&self.catalog, &item, user_id, coupon_codes, now).await;

        let Some(best) = best_candidate(&candidates).cloned() else {
            return DiscountResult::full_price(item);
        };

        let price = item.line_total();
        let amount = best.amount_for(price);
        if amount.is_zero() {
            return DiscountResult::full_price(item);
        }

        // Platform-funded site sales must not push the effective commission
        // below the floor. The guard is all-or-nothing: no partial discount.
        if best.is_site_sale() {
            match self.vendor_commission(item.vendor_id).await {
                Some(structure) => {
                    let check = check_commission_safety(price, &structure, amount);
                    if !check.is_safe() {
                        debug!(
                            product_id = item.product_id,
                            vendor_id = item.vendor_id,
                            discount_id = best.id,
                            "Site sale vetoed by commission floor"
                        );
                        return DiscountResult::excluded(item, COMMISSION_EXCLUSION_REASON);
                    }
                }
                None => {
                    return DiscountResult::excluded(item, COMMISSION_EXCLUSION_REASON);
                }
            }
        }

        let split = allocate_cost(&best, amount);
        let details = DiscountDetails {
            id: best.id,
            code: best.code,
            name: best.name,
            source: best.source,
            value: best.value,
            admin_cost: split.admin_cost,
            vendor_cost: split.vendor_cost,
        };

        DiscountResult::applied(item, amount, details)
    }

    /// Fetches and parses the vendor's commission rate.
    ///
    /// `None` means the rate could not be established - missing fee record,
    /// malformed blob, or a catalog failure. The caller treats all three as
    /// unsafe and vetoes the site sale.
    async fn vendor_commission(&self, vendor_id: i64) -> Option<CommissionStructure> {
        match self.catalog.vendor_fee_structure(vendor_id).await {
            Ok(Some(raw)) => match CommissionStructure::from_fee_structure_json(&raw) {
                Ok(structure) => Some(structure),
                Err(err) => {
                    warn!(vendor_id, error = %err, "Malformed vendor fee structure, vetoing site sale");
                    None
                }
            },
            Ok(None) => {
                warn!(vendor_id, "Vendor has no fee structure, vetoing site sale");
                None
            }
            Err(err) => {
                warn!(vendor_id, error = %err, "Fee structure lookup failed, vetoing site sale");
                None
            }
        }
    }

    /// Validates a typed-in coupon code for user-facing feedback.
    ///
    /// Unlike resolution, which silently drops ineligible codes per item,
    /// this walks the rejection reasons in order and reports the first one
    /// in storefront language. Accepts both explicit-code coupons and
    /// auto-apply sales so a customer re-typing a sale code still sees it
    /// confirmed.
    pub async fn validate_coupon_code(
        &self,
        code: &str,
        user_id: i64,
        cart_items: &[CartItem],
    ) -> CouponValidation {
        if let Err(err) = validate_coupon_code(code) {
            return CouponValidation::invalid(err.to_string());
        }

        let now = Utc::now();
        match self.check_code(code, user_id, cart_items, now).await {
            Ok(validation) => validation,
            Err(err) => {
                warn!(code, error = %err, "Coupon code validation failed");
                CouponValidation::rejected(CouponRejection::LookupFailed)
            }
        }
    }

    async fn check_code(
        &self,
        code: &str,
        user_id: i64,
        cart_items: &[CartItem],
        now: DateTime<Utc>,
    ) -> crate::error::CatalogResult<CouponValidation> {
        let record = self.catalog.coupon_by_code(code.trim()).await?;
        let Some(record) = record.filter(|r| r.is_active) else {
            return Ok(CouponValidation::rejected(CouponRejection::NotFound));
        };

        if record.valid_from > now {
            return Ok(CouponValidation::rejected(CouponRejection::NotYetActive));
        }
        if record.valid_until.map_or(false, |until| until < now) {
            return Ok(CouponValidation::rejected(CouponRejection::Expired));
        }

        if !coupon::usage_allows(&self.catalog, &record, user_id).await? {
            return Ok(CouponValidation::rejected(
                CouponRejection::UsageLimitExceeded,
            ));
        }

        if !cart_items.is_empty()
            && !cart_items
                .iter()
                .any(|item| record.applies_to(item.product_id, item.vendor_id))
        {
            return Ok(CouponValidation::rejected(CouponRejection::NotApplicable));
        }

        Ok(CouponValidation::valid(CouponSummary::from(&record)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

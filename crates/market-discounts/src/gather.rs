//! # Candidate Gathering
//!
//! Assembles every discount candidate applicable to one cart item from the
//! three disjoint sources.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Candidate Sources                                │
//! │                                                                     │
//! │  1. Auto-apply sales (no code needed)                               │
//! │     ├── site-wide sale with no product restrictions                 │
//! │     ├── sale explicitly scoped to this product+vendor               │
//! │     └── vendor-wide sale covering all of that vendor's products     │
//! │                                                                     │
//! │  2. Explicitly entered coupon codes (via CouponValidator)           │
//! │     └── ineligible codes silently dropped                           │
//! │                                                                     │
//! │  3. Accepted promotions (via PromotionValidator)                    │
//! │     └── invitation accepted + product approved + running            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure read, no side effects. A catalog failure in any one source logs a
//! warning and contributes zero candidates: resolution fails open toward
//! full price, never toward a discount that couldn't be verified.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use market_core::{CartItem, CouponType, DiscountCandidate};

use crate::catalog::{CatalogReader, CouponRecord};
use crate::coupon::{self, CouponValidator};
use crate::promotion::PromotionValidator;

/// True when an auto-apply sale covers this item.
///
/// Mirrors the three catalog matching rules: an unrestricted site-wide
/// sale, an explicit product+vendor entry, or an unrestricted vendor-wide
/// sale from the item's own vendor.
fn auto_sale_matches(record: &CouponRecord, item: &CartItem) -> bool {
    let unrestricted = record.product_scope.is_empty();

    (record.coupon_type == CouponType::SiteSale && unrestricted)
        || record
            .product_scope
            .iter()
            .any(|scope| scope.product_id == item.product_id && scope.vendor_id == item.vendor_id)
        || (record.created_by_vendor == Some(item.vendor_id) && unrestricted)
}

/// Gathers all validated candidates for one item.
pub(crate) async fn gather_candidates<C: CatalogReader>(
    catalog: &C,
    item: &CartItem,
    user_id: i64,
    coupon_codes: &[String],
    now: DateTime<Utc>,
) -> Vec<DiscountCandidate> {
    let mut candidates = Vec::new();

    // 1. Auto-apply sales. Usage caps apply to these too: a capped flash
    //    sale must stop auto-applying once it is exhausted.
    match catalog.active_auto_apply_coupons(now).await {
        Ok(records) => {
            for record in records.iter().filter(|r| auto_sale_matches(r, item)) {
                match coupon::usage_allows(catalog, record, user_id).await {
                    Ok(true) => candidates.push(record.to_candidate()),
                    Ok(false) => {}
                    Err(err) => {
                        warn!(coupon_id = record.id, error = %err, "Skipping auto-apply sale, usage lookup failed");
                    }
                }
            }
        }
        Err(err) => {
            warn!(product_id = item.product_id, error = %err, "Skipping auto-apply sales, catalog lookup failed");
        }
    }

    // 2. Explicitly entered coupon codes.
    let validator = CouponValidator::new(catalog);
    for code in coupon_codes {
        match validator
            .validate_for_item(code, item.product_id, item.vendor_id, user_id, now)
            .await
        {
            Ok(Some(candidate)) => candidates.push(candidate),
            Ok(None) => {}
            Err(err) => {
                warn!(code = %code, error = %err, "Skipping coupon code, catalog lookup failed");
            }
        }
    }

    // 3. Accepted promotions.
    let validator = PromotionValidator::new(catalog);
    match catalog
        .promotions_for_product(item.product_id, item.vendor_id)
        .await
    {
        Ok(offers) => {
            for offer in &offers {
                match validator.validate_offer(offer, user_id, now).await {
                    Ok(Some(candidate)) => candidates.push(candidate),
                    Ok(None) => {}
                    Err(err) => {
                        warn!(promotion_id = offer.promotion.id, error = %err, "Skipping promotion, usage lookup failed");
                    }
                }
            }
        }
        Err(err) => {
            warn!(product_id = item.product_id, error = %err, "Skipping promotions, catalog lookup failed");
        }
    }

    debug!(
        product_id = item.product_id,
        count = candidates.len(),
        "Gathered discount candidates"
    );

    candidates
}

// =============================================================================
// Unit Tests
// =============================================================================

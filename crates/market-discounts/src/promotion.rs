//! # Promotion Validation
//!
//! Validates a promotion offer for one cart item.
//!
//! Promotions differ from coupons in what gates them: instead of a code and
//! its temporal rules, an offer needs the campaign to be running, the vendor
//! to have accepted the invitation, and the specific product to have been
//! approved into the campaign. Usage caps work the same way as coupons.

use chrono::{DateTime, Utc};
use market_core::DiscountCandidate;

use crate::catalog::{ApprovalStatus, CatalogReader, InvitationStatus, PromotionOffer};
use crate::error::CatalogResult;

/// Checks a promotion's usage caps for a given user.
pub(crate) async fn usage_allows<C: CatalogReader>(
    catalog: &C,
    offer: &PromotionOffer,
    user_id: i64,
) -> CatalogResult<bool> {
    if offer.promotion.usage.total_exhausted() {
        return Ok(false);
    }

    if offer.promotion.usage.per_user_limit.is_some() {
        let user_used = catalog
            .user_promotion_usage(offer.promotion.id, user_id)
            .await?;
        return Ok(offer.promotion.usage.allows_user(user_used));
    }

    Ok(true)
}

/// Validates promotion offers for a single cart item.
pub(crate) struct PromotionValidator<'a, C> {
    catalog: &'a C,
}

impl<'a, C: CatalogReader> PromotionValidator<'a, C> {
    pub(crate) fn new(catalog: &'a C) -> Self {
        PromotionValidator { catalog }
    }

    /// Resolves an offer into a candidate, or `None` when the campaign is
    /// not running, the invitation was never accepted, the product is not
    /// approved, or a usage cap is hit.
    pub(crate) async fn validate_offer(
        &self,
        offer: &PromotionOffer,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> CatalogResult<Option<DiscountCandidate>> {
        if !offer.promotion.is_running(now)
            || offer.invitation != InvitationStatus::Accepted
            || offer.terms.approval != ApprovalStatus::Approved
        {
            return Ok(None);
        }

        if !usage_allows(self.catalog, offer, user_id).await? {
            return Ok(None);
        }

        Ok(Some(offer.to_candidate()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

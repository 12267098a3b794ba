//! # Catalog Collaborator Interfaces
//!
//! The read and write surfaces this service consumes. Persistence itself is
//! owned by the excluded storage layer; implementations of these traits
//! adapt whatever that layer is (SQL, RPC, fixtures) to the record types
//! defined here.
//!
//! ## Data Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Collaborator Surfaces                            │
//! │                                                                     │
//! │  CatalogReader (read-only)            UsageStore (write-only)       │
//! │  ─────────────────────────            ─────────────────────────     │
//! │  • auto-apply coupons                 • insert coupon usage row     │
//! │  • coupon by code                     • insert promotion usage row  │
//! │  • per-user usage counts              • conditional counter bump    │
//! │  • promotion offers                                                 │
//! │  • vendor fee structure                                             │
//! │                                                                     │
//! │  Usage counters are the ONLY mutable shared state; every other      │
//! │  lookup is read-only and cache-friendly.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure eligibility helpers (`in_window`, `applies_to`) live on the record
//! types so the validators stay thin and the rules unit-testable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use market_core::{
    CouponType, DiscountCandidate, DiscountSource, DiscountValue, Percent, PromotionSplit,
    UsageLimit,
};

use crate::error::CatalogResult;

// =============================================================================
// Coupon Records
// =============================================================================

/// How a coupon reaches the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// Applied automatically when eligibility matches; no code required.
    AutoApply,
    /// Applied only when the customer enters the code.
    CouponCode,
}

/// A product+vendor pair a coupon is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductScope {
    pub product_id: i64,
    pub vendor_id: i64,
}

/// A coupon as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    /// Catalog ID.
    pub id: i64,

    /// The code customers enter (also set for auto-apply sales).
    pub code: String,

    /// Display name.
    pub name: String,

    /// Optional marketing description, surfaced by the public validator.
    pub description: Option<String>,

    /// What the customer saves.
    #[serde(flatten)]
    pub value: DiscountValue,

    /// Who funds the discount.
    pub coupon_type: CouponType,

    /// Auto-apply sale or explicit code.
    pub application: ApplicationType,

    /// Vendor who created the coupon; `None` for platform coupons.
    pub created_by_vendor: Option<i64>,

    /// Soft-delete flag.
    pub is_active: bool,

    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,

    /// End of the validity window; `None` = open-ended.
    pub valid_until: Option<DateTime<Utc>>,

    /// Redemption caps and the current counter.
    pub usage: UsageLimit,

    /// Product restrictions. Empty = applies to every product from the
    /// coupon's creator.
    pub product_scope: Vec<ProductScope>,
}

impl CouponRecord {
    /// True while `now` is inside the validity window.
    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && self.valid_until.map_or(true, |until| until >= now)
    }

    /// True when the coupon covers this product.
    ///
    /// An empty scope covers every product from the coupon's creator (every
    /// product at all for platform coupons); otherwise only the explicitly
    /// listed product+vendor pairs qualify.
    pub fn applies_to(&self, product_id: i64, vendor_id: i64) -> bool {
        if self.product_scope.is_empty() {
            return self
                .created_by_vendor
                .map_or(true, |creator| creator == vendor_id);
        }
        self.product_scope
            .iter()
            .any(|scope| scope.product_id == product_id && scope.vendor_id == vendor_id)
    }

    /// Normalizes this record into a discount candidate.
    pub fn to_candidate(&self) -> DiscountCandidate {
        DiscountCandidate {
            id: self.id,
            code: Some(self.code.clone()),
            name: self.name.clone(),
            value: self.value,
            source: DiscountSource::Coupon,
            coupon_type: Some(self.coupon_type),
            split: None,
        }
    }
}

// =============================================================================
// Promotion Records
// =============================================================================

/// Lifecycle status of a promotion campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    Draft,
    Active,
    Ended,
}

/// A vendor's response to a promotion invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

/// Per-product approval inside a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A promotion campaign as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRecord {
    /// Catalog ID.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Optional campaign code shown on receipts.
    pub code: Option<String>,

    /// Campaign lifecycle status.
    pub status: PromotionStatus,

    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,

    /// End of the validity window; `None` = open-ended.
    pub valid_until: Option<DateTime<Utc>>,

    /// Redemption caps and the current counter.
    pub usage: UsageLimit,
}

impl PromotionRecord {
    /// True while `now` is inside the validity window.
    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && self.valid_until.map_or(true, |until| until >= now)
    }

    /// True when the campaign is running right now.
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.status == PromotionStatus::Active && self.in_window(now)
    }
}

/// The negotiated terms for one product inside a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionTerms {
    /// Total discount the customer sees (always a percentage).
    pub customer_discount: Percent,

    /// How the cost divides between platform and vendor.
    pub split: PromotionSplit,

    /// Whether this product was approved into the campaign.
    pub approval: ApprovalStatus,
}

/// A promotion joined with one product's terms and the vendor's invitation,
/// the unit returned by [`CatalogReader::promotions_for_product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOffer {
    pub promotion: PromotionRecord,
    pub terms: PromotionTerms,
    pub invitation: InvitationStatus,
}

impl PromotionOffer {
    /// Normalizes this offer into a discount candidate.
    pub fn to_candidate(&self) -> DiscountCandidate {
        DiscountCandidate {
            id: self.promotion.id,
            code: self.promotion.code.clone(),
            name: self.promotion.name.clone(),
            value: DiscountValue::Percentage(self.terms.customer_discount),
            source: DiscountSource::Promotion,
            coupon_type: None,
            split: Some(self.terms.split),
        }
    }
}

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Read access to discount, promotion, and commission records.
///
/// Implementations must be side-effect free: resolution may call these
/// concurrently for every item in a cart, in no particular order.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// All active auto-apply coupons whose validity window contains `now`.
    /// Product matching happens in the gatherer.
    async fn active_auto_apply_coupons(&self, now: DateTime<Utc>)
        -> CatalogResult<Vec<CouponRecord>>;

    /// Looks a coupon up by its exact code, regardless of status; the
    /// validators decide what an inactive or out-of-window record means.
    async fn coupon_by_code(&self, code: &str) -> CatalogResult<Option<CouponRecord>>;

    /// How many times this user has redeemed this coupon.
    async fn user_coupon_usage(&self, coupon_id: i64, user_id: i64) -> CatalogResult<u32>;

    /// Promotion offers covering this product, joined with the product's
    /// terms and the vendor's invitation status. Offers for unapproved
    /// products or undecided invitations are included; the validator
    /// filters them.
    async fn promotions_for_product(
        &self,
        product_id: i64,
        vendor_id: i64,
    ) -> CatalogResult<Vec<PromotionOffer>>;

    /// How many times this user has redeemed this promotion.
    async fn user_promotion_usage(&self, promotion_id: i64, user_id: i64) -> CatalogResult<u32>;

    /// The vendor's raw `fee_structure` JSON blob, if the vendor has one.
    /// Parsing happens at the typed boundary in market-core.
    async fn vendor_fee_structure(&self, vendor_id: i64) -> CatalogResult<Option<String>>;
}

/// Result of one conditional usage write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOutcome {
    /// Row inserted and counter bumped.
    Recorded,
    /// The total cap was reached between validation and recording; nothing
    /// was written.
    CapExceeded,
}

/// Write access limited to usage rows and counters.
///
/// ## Atomicity Contract
/// `record_*_use` must insert the usage row and increment the total counter
/// **conditionally** - only while the counter is still under the total cap -
/// in one atomic step, reporting [`UsageOutcome::CapExceeded`] otherwise.
/// Eligibility reads earlier in checkout are advisory; this is where exact
/// caps are enforced.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Records one redemption of a coupon.
    async fn record_coupon_use(
        &self,
        coupon_id: i64,
        user_id: i64,
        order_id: i64,
    ) -> CatalogResult<UsageOutcome>;

    /// Records one redemption of a promotion.
    async fn record_promotion_use(
        &self,
        promotion_id: i64,
        user_id: i64,
        order_id: i64,
    ) -> CatalogResult<UsageOutcome>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use market_core::Money;

    fn coupon(valid_from: DateTime<Utc>, valid_until: Option<DateTime<Utc>>) -> CouponRecord {
        CouponRecord {
            id: 1,
            code: "SPRING20".to_string(),
            name: "Spring sale".to_string(),
            description: None,
            value: DiscountValue::Percentage(Percent::from_bps(2000)),
            coupon_type: CouponType::SiteSale,
            application: ApplicationType::CouponCode,
            created_by_vendor: None,
            is_active: true,
            valid_from,
            valid_until,
            usage: UsageLimit::unlimited(),
            product_scope: Vec::new(),
        }
    }

    #[test]
    fn test_in_window() {
        let now = Utc::now();

        assert!(coupon(now - Duration::days(1), None).in_window(now));
        assert!(coupon(now - Duration::days(1), Some(now + Duration::days(1))).in_window(now));
        assert!(!coupon(now + Duration::days(1), None).in_window(now));
        assert!(!coupon(now - Duration::days(2), Some(now - Duration::days(1))).in_window(now));
    }

    #[test]
    fn test_empty_scope_platform_coupon_applies_everywhere() {
        let record = coupon(Utc::now(), None);
        assert!(record.applies_to(1, 1));
        assert!(record.applies_to(999, 42));
    }

    #[test]
    fn test_empty_scope_vendor_coupon_covers_own_products_only() {
        let mut record = coupon(Utc::now(), None);
        record.coupon_type = CouponType::VendorCoupon;
        record.created_by_vendor = Some(10);

        assert!(record.applies_to(1, 10));
        assert!(!record.applies_to(1, 11));
    }

    #[test]
    fn test_scoped_coupon_applies_to_listed_pairs_only() {
        let mut record = coupon(Utc::now(), None);
        record.product_scope = vec![ProductScope {
            product_id: 7,
            vendor_id: 3,
        }];

        assert!(record.applies_to(7, 3));
        assert!(!record.applies_to(7, 4)); // same product, different vendor
        assert!(!record.applies_to(8, 3));
    }

    #[test]
    fn test_coupon_to_candidate() {
        let record = coupon(Utc::now(), None);
        let candidate = record.to_candidate();

        assert_eq!(candidate.id, record.id);
        assert_eq!(candidate.code.as_deref(), Some("SPRING20"));
        assert_eq!(candidate.source, DiscountSource::Coupon);
        assert_eq!(candidate.coupon_type, Some(CouponType::SiteSale));
        assert!(candidate.split.is_none());
    }

    #[test]
    fn test_promotion_offer_to_candidate() {
        let offer = PromotionOffer {
            promotion: PromotionRecord {
                id: 9,
                name: "Holiday push".to_string(),
                code: Some("HOLIDAY".to_string()),
                status: PromotionStatus::Active,
                valid_from: Utc::now() - Duration::days(1),
                valid_until: None,
                usage: UsageLimit::unlimited(),
            },
            terms: PromotionTerms {
                customer_discount: Percent::from_bps(2000),
                split: PromotionSplit {
                    admin_bps: 7000,
                    vendor_bps: 3000,
                },
                approval: ApprovalStatus::Approved,
            },
            invitation: InvitationStatus::Accepted,
        };

        let candidate = offer.to_candidate();
        assert_eq!(candidate.source, DiscountSource::Promotion);
        assert_eq!(
            candidate.value,
            DiscountValue::Percentage(Percent::from_bps(2000))
        );
        assert!(candidate.split.is_some());
        assert!(candidate.coupon_type.is_none());
        // Promotions never carry a fixed amount
        assert_ne!(candidate.value, DiscountValue::FixedAmount(Money::zero()));
    }

    #[test]
    fn test_promotion_is_running() {
        let now = Utc::now();
        let mut record = PromotionRecord {
            id: 1,
            name: "P".to_string(),
            code: None,
            status: PromotionStatus::Active,
            valid_from: now - Duration::days(1),
            valid_until: Some(now + Duration::days(1)),
            usage: UsageLimit::unlimited(),
        };
        assert!(record.is_running(now));

        record.status = PromotionStatus::Ended;
        assert!(!record.is_running(now));
    }
}

//! # Cost Allocation
//!
//! Splits an applied discount's cost between the platform ("admin") and the
//! vendor.
//!
//! ## Allocation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Coupon, vendor_coupon   → vendor pays 100%                         │
//! │  Coupon, admin_coupon    → platform pays 100%                       │
//! │  Coupon, site_sale       → platform pays 100%                       │
//! │  Promotion               → proportional to the negotiated split     │
//! │  Promotion, empty split  → nobody pays (upstream data error)        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Promotion shares are normalized over `admin + vendor`, so a 70/30 split
//! of a $20.00 discount allocates $14.00 / $6.00. The admin share is rounded
//! to the cent and the vendor share is the exact remainder, so the two always
//! sum to the discount amount.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CouponType, DiscountCandidate, DiscountSource};

/// How a discount's cost is divided between the two financial parties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSplit {
    /// Platform share.
    pub admin_cost: Money,
    /// Vendor share.
    pub vendor_cost: Money,
}

impl CostSplit {
    /// Nobody pays anything.
    pub const fn zero() -> Self {
        CostSplit {
            admin_cost: Money::zero(),
            vendor_cost: Money::zero(),
        }
    }

    fn admin_only(amount: Money) -> Self {
        CostSplit {
            admin_cost: amount,
            vendor_cost: Money::zero(),
        }
    }

    fn vendor_only(amount: Money) -> Self {
        CostSplit {
            admin_cost: Money::zero(),
            vendor_cost: amount,
        }
    }

    /// Total allocated cost.
    pub fn total(&self) -> Money {
        self.admin_cost + self.vendor_cost
    }
}

/// Allocates a discount's cost per the candidate's funding rules.
///
/// A promotion with an empty split allocates nothing; the promotion terms
/// are broken upstream and resolution must not invent a payer.
///
/// ## Example
/// ```rust
/// use market_core::allocation::allocate_cost;
/// use market_core::money::{Money, Percent};
/// use market_core::types::{
///     CouponType, DiscountCandidate, DiscountSource, DiscountValue,
/// };
///
/// let vendor_coupon = DiscountCandidate {
///     id: 1,
///     code: Some("HANDMADE10".to_string()),
///     name: "Handmade 10".to_string(),
///     value: DiscountValue::Percentage(Percent::from_bps(1000)),
///     source: DiscountSource::Coupon,
///     coupon_type: Some(CouponType::VendorCoupon),
///     split: None,
/// };
///
/// let split = allocate_cost(&vendor_coupon, Money::from_cents(1000));
/// assert_eq!(split.vendor_cost.cents(), 1000);
/// assert!(split.admin_cost.is_zero());
/// ```
pub fn allocate_cost(candidate: &DiscountCandidate, discount_amount: Money) -> CostSplit {
    match candidate.source {
        DiscountSource::Coupon => match candidate.coupon_type {
            Some(CouponType::VendorCoupon) => CostSplit::vendor_only(discount_amount),
            Some(CouponType::AdminCoupon) | Some(CouponType::SiteSale) => {
                CostSplit::admin_only(discount_amount)
            }
            // A coupon candidate without a funding type cannot be billed.
            None => CostSplit::zero(),
        },
        DiscountSource::Promotion => match candidate.split {
            Some(split) if !split.is_empty() => {
                let (admin_cost, vendor_cost) =
                    discount_amount.split(split.admin_bps, split.vendor_bps);
                CostSplit {
                    admin_cost,
                    vendor_cost,
                }
            }
            _ => CostSplit::zero(),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Core domain types for discount resolution.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌──────────────────┐   ┌───────────────────┐   ┌───────────────┐   │
//! │  │    CartItem      │   │ DiscountCandidate │   │ DiscountResult│   │
//! │  │  ──────────────  │   │  ───────────────  │   │  ───────────  │   │
//! │  │  product_id      │   │  value            │   │  prices       │   │
//! │  │  vendor_id       │   │  source           │   │  outcome      │   │
//! │  │  unit_price_cents│   │  coupon_type      │   │   ├ NoDiscount│   │
//! │  │  quantity        │   │  split            │   │   ├ Applied   │   │
//! │  └──────────────────┘   └───────────────────┘   │   └ Excluded  │   │
//! │                                                 └───────────────┘   │
//! │                                                                     │
//! │  ┌──────────────────┐   ┌───────────────────┐                       │
//! │  │   UsageLimit     │   │CommissionStructure│                       │
//! │  │  total / per-user│   │  rate (bps)       │                       │
//! │  └──────────────────┘   └───────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results are explicit immutable records: the pipeline never mutates a cart
//! item, it wraps one in a [`DiscountResult`] whose constructors enforce the
//! pricing invariants.

use serde::{Deserialize, Serialize};

use crate::money::{Money, Percent};
use crate::DEFAULT_COMMISSION_BPS;

// =============================================================================
// Cart Item
// =============================================================================

/// A line item in a shopping cart, as handed over by the checkout
/// orchestrator. Immutable input to discount resolution.
///
/// ## Design Notes
/// - Prices are frozen cents at the time the item entered the cart
/// - The discount base price is the line total (unit price × quantity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID in the catalog.
    pub product_id: i64,

    /// Vendor (seller) who owns the product.
    pub vendor_id: i64,

    /// Product name at time of adding (for result records and logs).
    pub name: String,

    /// Unit price in cents at time of adding (frozen, >= 0).
    pub unit_price_cents: i64,

    /// Quantity in cart (>= 1).
    pub quantity: i64,
}

impl CartItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Discount Candidate
// =============================================================================

/// Where a discount candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    /// A coupon record (auto-apply sale or explicit code).
    Coupon,
    /// A marketing promotion with a negotiated cost split.
    Promotion,
}

/// Who funds a coupon discount. Meaningful only for coupon candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    /// Platform-funded site-wide sale. Subject to the commission floor.
    SiteSale,
    /// Vendor-issued coupon, vendor bears the cost.
    VendorCoupon,
    /// Admin-issued coupon, platform bears the cost.
    AdminCoupon,
}

/// The typed rendition of `discount_type` + `discount_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "discount_type", content = "discount_value", rename_all = "snake_case")]
pub enum DiscountValue {
    /// A percentage of the item price, in basis points.
    Percentage(Percent),
    /// A fixed money amount, clamped to the item price on application.
    FixedAmount(Money),
}

impl DiscountValue {
    /// Computes the discount amount for a given base price.
    ///
    /// Fixed amounts never exceed the price; the result is always in
    /// `[0, price]` for a non-negative price.
    pub fn amount_for(&self, price: Money) -> Money {
        match *self {
            DiscountValue::Percentage(pct) => pct.of(price),
            DiscountValue::FixedAmount(amount) => amount.min(price),
        }
    }

    /// True for percentage-type values.
    #[inline]
    pub const fn is_percentage(&self) -> bool {
        matches!(self, DiscountValue::Percentage(_))
    }
}

/// The negotiated admin/vendor cost split of a promotion.
///
/// Both weights are basis points of the customer discount and must sum
/// to at most 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSplit {
    /// Platform share of the discount cost, in basis points.
    pub admin_bps: u32,
    /// Vendor share of the discount cost, in basis points.
    pub vendor_bps: u32,
}

impl PromotionSplit {
    /// True when neither party carries any share (a data error upstream).
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.admin_bps == 0 && self.vendor_bps == 0
    }
}

/// One applicable discount for one cart item, already validated for
/// temporal eligibility, product scope, and usage caps.
///
/// Candidates are ephemeral: gathered per resolution call, ranked, and
/// discarded. Exactly one candidate is ever applied per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCandidate {
    /// Coupon or promotion ID in the catalog.
    pub id: i64,

    /// Display code, if the discount has one.
    pub code: Option<String>,

    /// Display name.
    pub name: String,

    /// What the customer saves.
    #[serde(flatten)]
    pub value: DiscountValue,

    /// Coupon or promotion.
    pub source: DiscountSource,

    /// Funding type; present only for coupon candidates.
    pub coupon_type: Option<CouponType>,

    /// Cost split; present only for promotion candidates.
    pub split: Option<PromotionSplit>,
}

impl DiscountCandidate {
    /// Computes the discount amount for a given base price.
    #[inline]
    pub fn amount_for(&self, price: Money) -> Money {
        self.value.amount_for(price)
    }

    /// True for platform-funded site-wide sales (commission floor applies).
    #[inline]
    pub fn is_site_sale(&self) -> bool {
        self.coupon_type == Some(CouponType::SiteSale)
    }
}

// =============================================================================
// Usage Limits
// =============================================================================

/// Redemption caps on a coupon or promotion.
///
/// `None` means unlimited. The counter reflects the catalog's view at read
/// time; the authoritative check happens when usage is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimit {
    /// Cap on total redemptions across all users.
    pub total_limit: Option<u32>,

    /// Cap on redemptions per user.
    pub per_user_limit: Option<u32>,

    /// Total redemptions so far.
    pub total_used: u32,
}

impl UsageLimit {
    /// No caps at all.
    pub const fn unlimited() -> Self {
        UsageLimit {
            total_limit: None,
            per_user_limit: None,
            total_used: 0,
        }
    }

    /// True when the total cap has been reached.
    pub fn total_exhausted(&self) -> bool {
        matches!(self.total_limit, Some(limit) if self.total_used >= limit)
    }

    /// True when a user with `user_used` prior redemptions may redeem again.
    pub fn allows_user(&self, user_used: u32) -> bool {
        match self.per_user_limit {
            Some(limit) => user_used < limit,
            None => true,
        }
    }
}

// =============================================================================
// Commission Structure
// =============================================================================

/// Per-vendor commission configuration.
///
/// The catalog stores this as a free-form `fee_structure` JSON blob; this
/// type is the single typed deserialization boundary for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionStructure {
    /// Platform commission on this vendor's sales.
    pub rate: Percent,
}

/// Wire shape of the stored fee-structure blob. Only the commission field
/// matters to discount resolution; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct FeeStructureWire {
    commission_percentage: Option<f64>,
}

impl CommissionStructure {
    /// Parses a raw `fee_structure` JSON blob.
    ///
    /// ## Contract
    /// - Valid JSON without a `commission_percentage` field → the 15%
    ///   default rate.
    /// - Malformed JSON → an error. The caller decides the fallback; the
    ///   commission guard treats it as unsafe (full price).
    ///
    /// ## Example
    /// ```rust
    /// use market_core::types::CommissionStructure;
    ///
    /// let parsed = CommissionStructure::from_fee_structure_json(
    ///     r#"{"commission_percentage": 12.5}"#,
    /// ).unwrap();
    /// assert_eq!(parsed.rate.bps(), 1250);
    /// ```
    pub fn from_fee_structure_json(raw: &str) -> Result<Self, serde_json::Error> {
        let wire: FeeStructureWire = serde_json::from_str(raw)?;
        Ok(match wire.commission_percentage {
            Some(pct) => CommissionStructure {
                rate: Percent::from_percentage(pct),
            },
            None => CommissionStructure::default(),
        })
    }
}

/// Default commission is the platform-wide 15%.
impl Default for CommissionStructure {
    fn default() -> Self {
        CommissionStructure {
            rate: Percent::from_bps(DEFAULT_COMMISSION_BPS),
        }
    }
}

// =============================================================================
// Discount Result
// =============================================================================

/// The applied-discount view attached to a priced item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountDetails {
    /// Coupon or promotion ID.
    pub id: i64,
    /// Display code, if any.
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Coupon or promotion.
    pub source: DiscountSource,
    /// What the customer saved.
    #[serde(flatten)]
    pub value: DiscountValue,
    /// Platform share of the discount cost.
    pub admin_cost: Money,
    /// Vendor share of the discount cost.
    pub vendor_cost: Money,
}

/// How discount resolution ended for one item.
///
/// Three outcomes that must never be confused: no discount found (normal),
/// a discount applied, or a discount vetoed by the commission floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiscountOutcome {
    /// No applicable discount. Normal terminal state, not an error.
    NoDiscount,
    /// A discount was applied.
    Applied {
        /// The applied discount and its cost allocation.
        details: DiscountDetails,
    },
    /// A discount was found but vetoed; the item stays at full price.
    Excluded {
        /// Human-readable reason, surfaced to the caller.
        reason: String,
    },
}

/// The per-item output of discount resolution.
///
/// ## Invariants (enforced by the constructors)
/// - `discounted_price = max(0, original_price − discount_amount)`
/// - `0 ≤ discount_amount ≤ original_price`
/// - `admin_cost + vendor_cost = discount_amount` for applied discounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// The input item, untouched.
    pub item: CartItem,
    /// Line total before discounting.
    pub original_price: Money,
    /// Line total after discounting.
    pub discounted_price: Money,
    /// Amount taken off the line total.
    pub discount_amount: Money,
    /// What happened.
    pub outcome: DiscountOutcome,
}

impl DiscountResult {
    /// An item with no applicable discount.
    pub fn full_price(item: CartItem) -> Self {
        let price = item.line_total();
        DiscountResult {
            item,
            original_price: price,
            discounted_price: price,
            discount_amount: Money::zero(),
            outcome: DiscountOutcome::NoDiscount,
        }
    }

    /// An item with a discount applied.
    ///
    /// Clamps the amount into `[0, original_price]` before deriving the
    /// discounted price, so the invariants hold for any input.
    pub fn applied(item: CartItem, amount: Money, details: DiscountDetails) -> Self {
        let original = item.line_total();
        let amount = Money::from_cents(amount.cents().max(0).min(original.cents().max(0)));
        DiscountResult {
            discounted_price: original.saturating_sub(amount),
            item,
            original_price: original,
            discount_amount: amount,
            outcome: DiscountOutcome::Applied { details },
        }
    }

    /// An item whose discount was vetoed; reverts to full price.
    pub fn excluded(item: CartItem, reason: impl Into<String>) -> Self {
        let price = item.line_total();
        DiscountResult {
            item,
            original_price: price,
            discounted_price: price,
            discount_amount: Money::zero(),
            outcome: DiscountOutcome::Excluded {
                reason: reason.into(),
            },
        }
    }

    /// True when a discount was applied.
    pub fn discount_applied(&self) -> bool {
        matches!(self.outcome, DiscountOutcome::Applied { .. })
    }

    /// True when a discount was found but vetoed.
    pub fn is_excluded(&self) -> bool {
        matches!(self.outcome, DiscountOutcome::Excluded { .. })
    }

    /// The applied discount, if any.
    pub fn details(&self) -> Option<&DiscountDetails> {
        match &self.outcome {
            DiscountOutcome::Applied { details } => Some(details),
            _ => None,
        }
    }
}

// =============================================================================
// Applied Discount (usage recording view)
// =============================================================================

/// The slice of an applied discount that usage recording needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    /// Coupon or promotion ID.
    pub id: i64,
    /// Decides which usage table the record lands in.
    pub source: DiscountSource,
}

impl From<&DiscountDetails> for AppliedDiscount {
    fn from(details: &DiscountDetails) -> Self {
        AppliedDiscount {
            id: details.id,
            source: details.source,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Commission Safety Check
//!
//! Platform-funded site sales are subsidized out of the platform's
//! commission. The subsidy must never push the commission kept on an item
//! below a fixed floor of 3% of the item price.
//!
//! ## The Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  original_commission = price × commission_rate                      │
//! │  adjusted_commission = original_commission − discount_amount        │
//! │  floor               = price × 3%                                   │
//! │                                                                     │
//! │  adjusted_commission < floor  →  VETO (item reverts to full price)  │
//! │                                                                     │
//! │  $100 item, 15% commission, 15% site sale:                          │
//! │    commission $15 − discount $15 = $0 < $3 floor → vetoed           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The veto is all-or-nothing: no partial reduction of the discount to
//! squeeze under the floor. Only site-sale coupons are checked; vendor and
//! admin coupons spend their issuer's own money.

use crate::money::{Money, Percent};
use crate::types::CommissionStructure;
use crate::MIN_COMMISSION_BPS;

/// Outcome of the commission safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionCheck {
    /// The platform keeps at least the floor commission.
    Safe,
    /// The subsidy would breach the floor; the discount must be vetoed.
    BelowFloor {
        /// Commission left after funding the discount (can be negative).
        adjusted: Money,
        /// The 3% floor for this item.
        floor: Money,
    },
}

impl CommissionCheck {
    /// True when the discount may be applied.
    #[inline]
    pub const fn is_safe(&self) -> bool {
        matches!(self, CommissionCheck::Safe)
    }
}

/// Human-readable veto reason attached to excluded items.
pub const COMMISSION_EXCLUSION_REASON: &str =
    "Commission safety rule - would reduce platform commission below 3%";

/// Checks whether a platform-funded discount keeps the commission above the
/// 3% floor.
///
/// ## Example
/// ```rust
/// use market_core::commission::check_commission_safety;
/// use market_core::money::{Money, Percent};
/// use market_core::types::CommissionStructure;
///
/// let structure = CommissionStructure { rate: Percent::from_bps(1500) };
///
/// // $100 item, $10 subsidy: $15 − $10 = $5 ≥ $3 floor
/// let check = check_commission_safety(
///     Money::from_cents(10_000),
///     &structure,
///     Money::from_cents(1000),
/// );
/// assert!(check.is_safe());
/// ```
pub fn check_commission_safety(
    price: Money,
    structure: &CommissionStructure,
    discount_amount: Money,
) -> CommissionCheck {
    let original_commission = structure.rate.of(price);
    let adjusted = original_commission - discount_amount;
    let floor = Percent::from_bps(MIN_COMMISSION_BPS).of(price);

    if adjusted < floor {
        CommissionCheck::BelowFloor { adjusted, floor }
    } else {
        CommissionCheck::Safe
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fifteen_percent() -> CommissionStructure {
        CommissionStructure {
            rate: Percent::from_bps(1500),
        }
    }

    /// $100 item, 15% commission, 15% site sale: adjusted commission $0
    /// falls below the $3 floor.
    #[test]
    fn test_full_subsidy_is_vetoed() {
        let check = check_commission_safety(
            Money::from_cents(10_000),
            &fifteen_percent(),
            Money::from_cents(1500),
        );
        assert_eq!(
            check,
            CommissionCheck::BelowFloor {
                adjusted: Money::zero(),
                floor: Money::from_cents(300),
            }
        );
    }

    #[test]
    fn test_moderate_subsidy_is_safe() {
        // $15 − $10 = $5 ≥ $3
        let check = check_commission_safety(
            Money::from_cents(10_000),
            &fifteen_percent(),
            Money::from_cents(1000),
        );
        assert!(check.is_safe());
    }

    #[test]
    fn test_exactly_at_floor_is_safe() {
        // $15 − $12 = $3, floor is $3: not below, so allowed
        let check = check_commission_safety(
            Money::from_cents(10_000),
            &fifteen_percent(),
            Money::from_cents(1200),
        );
        assert!(check.is_safe());
    }

    #[test]
    fn test_adjusted_commission_can_go_negative() {
        // Subsidy larger than the whole commission
        let check = check_commission_safety(
            Money::from_cents(10_000),
            &fifteen_percent(),
            Money::from_cents(2000),
        );
        match check {
            CommissionCheck::BelowFloor { adjusted, .. } => {
                assert!(adjusted.is_negative());
            }
            CommissionCheck::Safe => panic!("expected a veto"),
        }
    }

    #[test]
    fn test_default_rate_is_used_for_sparse_fee_structures() {
        // Default 15% on a $10 item: $1.50 − $1.00 = $0.50 ≥ $0.30 floor
        let check = check_commission_safety(
            Money::from_cents(1000),
            &CommissionStructure::default(),
            Money::from_cents(100),
        );
        assert!(check.is_safe());
    }
}

//! # Best-Discount Selection
//!
//! Picks exactly one candidate per item out of the gathered list.
//!
//! ## Ordering Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Candidate Ranking                                │
//! │                                                                     │
//! │  1. Percentage discounts outrank fixed amounts, ALWAYS              │
//! │  2. Among percentages: higher rate wins                             │
//! │  3. Among fixed amounts: higher amount wins                         │
//! │  4. Ties keep the earliest candidate (stable)                       │
//! │                                                                     │
//! │  {20%, 10%}           → 20%                                         │
//! │  {15%, $5 fixed}      → 15%  (even on a $10 item, where $5 > $1.50) │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rule 1 can pick the smaller absolute saving on low-priced items. That is
//! the shipped behavior; changing it to compare absolute savings is a product
//! decision, not a code fix, and is tracked with the product owners.

use crate::types::{DiscountCandidate, DiscountValue};

/// Rank of a candidate: kind first (percentage above fixed), then magnitude.
///
/// Percentage and fixed values are never compared by magnitude against each
/// other, so mixing bps and cents in the second component is safe.
fn rank(candidate: &DiscountCandidate) -> (u8, i64) {
    match candidate.value {
        DiscountValue::Percentage(pct) => (1, pct.bps() as i64),
        DiscountValue::FixedAmount(amount) => (0, amount.cents()),
    }
}

/// Picks the single best candidate, or `None` for an empty list.
///
/// Deterministic: identical input lists always select the same candidate,
/// and ties resolve to the earliest entry.
///
/// ## Example
/// ```rust
/// use market_core::money::Percent;
/// use market_core::selection::best_candidate;
/// use market_core::types::{DiscountCandidate, DiscountSource, DiscountValue};
///
/// let twenty = DiscountCandidate {
///     id: 1,
///     code: None,
///     name: "Spring sale".to_string(),
///     value: DiscountValue::Percentage(Percent::from_bps(2000)),
///     source: DiscountSource::Coupon,
///     coupon_type: None,
///     split: None,
/// };
/// let ten = DiscountCandidate {
///     id: 2,
///     value: DiscountValue::Percentage(Percent::from_bps(1000)),
///     ..twenty.clone()
/// };
///
/// let candidates = [ten, twenty.clone()];
/// let best = best_candidate(&candidates).unwrap();
/// assert_eq!(best.id, twenty.id);
/// ```
pub fn best_candidate(candidates: &[DiscountCandidate]) -> Option<&DiscountCandidate> {
    let mut best: Option<(&DiscountCandidate, (u8, i64))> = None;

    for candidate in candidates {
        let candidate_rank = rank(candidate);
        match best {
            // Strictly greater replaces; equal keeps the earlier candidate.
            Some((_, best_rank)) if candidate_rank <= best_rank => {}
            _ => best = Some((candidate, candidate_rank)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

// =============================================================================
// Unit Tests
// =============================================================================

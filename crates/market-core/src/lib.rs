//! # market-core: Pure Discount Logic for Maker Market
//!
//! This crate is the **heart** of discount resolution. It contains all
//! pricing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Discount Resolution Architecture                   │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Checkout Orchestrator (excluded)                 │  │
//! │  │     cart assembly ──► discount resolution ──► payment         │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                   market-discounts (async)                    │  │
//! │  │   gather candidates ──► validate ──► record usage             │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │               ★ market-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────────┐        │  │
//! │  │   │  money  │ │  types  │ │ selection │ │ allocation │        │  │
//! │  │   │ Percent │ │ results │ │ best pick │ │ cost split │        │  │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └────────────┘        │  │
//! │  │   ┌────────────┐ ┌────────────┐                               │  │
//! │  │   │ commission │ │ validation │                               │  │
//! │  │   └────────────┘ └────────────┘                               │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CartItem, DiscountCandidate, DiscountResult)
//! - [`money`] - Money and Percent with integer arithmetic (no floats!)
//! - [`selection`] - Deterministic best-discount ordering
//! - [`commission`] - The 3% commission-floor safety check
//! - [`allocation`] - Platform/vendor cost splitting
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same candidates in, same selection out, always
//! 2. **No I/O**: catalog access lives in market-discounts behind traits
//! 3. **Integer Money**: cents (i64) and basis points (u32), never floats
//! 4. **Explicit Outcomes**: "no discount" and "vetoed" are result states,
//!    not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use market_core::money::{Money, Percent};
//! use market_core::selection::best_candidate;
//! use market_core::types::{DiscountCandidate, DiscountSource, DiscountValue};
//!
//! let sale = DiscountCandidate {
//!     id: 1,
//!     code: None,
//!     name: "Spring sale".to_string(),
//!     value: DiscountValue::Percentage(Percent::from_bps(2000)),
//!     source: DiscountSource::Coupon,
//!     coupon_type: None,
//!     split: None,
//! };
//!
//! let best = best_candidate(std::slice::from_ref(&sale)).unwrap();
//! // 20% of a $50.00 line
//! assert_eq!(best.amount_for(Money::from_cents(5000)).cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod commission;
pub mod error;
pub mod money;
pub mod selection;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use market_core::Money` instead of
// `use market_core::money::Money`.

pub use allocation::CostSplit;
pub use error::ValidationError;
pub use money::{Money, Percent};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Platform commission applied when a vendor's fee structure doesn't name
/// one: 15%.
pub const DEFAULT_COMMISSION_BPS: u32 = 1500;

/// Minimum commission the platform must keep on an item after funding a
/// site-sale discount: 3% of the item price. Breaching this floor vetoes
/// the discount outright.
pub const MIN_COMMISSION_BPS: u32 = 300;

/// Maximum accepted coupon code length.
///
/// Catalog codes are far shorter; this only bounds what we ship to lookups.
pub const MAX_COUPON_CODE_LEN: usize = 50;

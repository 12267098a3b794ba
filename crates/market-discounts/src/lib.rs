//! # market-discounts: Discount Resolution Service for Maker Market
//!
//! The async layer between checkout and the pure pricing rules in
//! `market-core`. It gathers discount candidates from a catalog, picks the
//! best one per item, guards the platform's commission, and records usage
//! after the order is placed.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     market-discounts                                │
//! │                                                                     │
//! │   ┌─────────────────┐          ┌──────────────────┐                 │
//! │   │ DiscountService │          │  UsageRecorder   │                 │
//! │   │  (pure read)    │          │  (post-order)    │                 │
//! │   └────────┬────────┘          └────────┬─────────┘                 │
//! │            │                            │                           │
//! │   ┌────────▼────────────────┐  ┌────────▼─────────┐                 │
//! │   │ gather ► coupon/promo   │  │ conditional      │                 │
//! │   │ validators ► core rules │  │ counter writes   │                 │
//! │   └────────┬────────────────┘  └────────┬─────────┘                 │
//! │            │                            │                           │
//! │   ┌────────▼────────┐          ┌────────▼─────────┐                 │
//! │   │  CatalogReader  │          │    UsageStore    │                 │
//! │   │  (trait)        │          │    (trait)       │                 │
//! │   └─────────────────┘          └──────────────────┘                 │
//! │                                                                     │
//! │   Storage adapters implement the traits; MemoryCatalog ships as a   │
//! │   fixture implementation for tests.                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - The resolution façade checkout calls
//! - [`usage`] - Post-order usage recording
//! - [`catalog`] - Collaborator traits and catalog record types
//! - [`memory`] - In-memory fixture catalog
//! - [`error`] - Catalog error types
//!
//! ## Failure Posture
//!
//! Resolution fails **open**: any catalog problem degrades the affected
//! item to full price. Usage recording never aborts an already-charged
//! order; problems are logged and tallied for out-of-band reconciliation.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod memory;
pub mod service;
pub mod usage;

mod coupon;
mod gather;
mod promotion;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{
    ApplicationType, ApprovalStatus, CatalogReader, CouponRecord, InvitationStatus, ProductScope,
    PromotionOffer, PromotionRecord, PromotionStatus, PromotionTerms, UsageOutcome, UsageStore,
};
pub use error::{CatalogError, CatalogResult};
pub use memory::MemoryCatalog;
pub use service::{CouponRejection, CouponSummary, CouponValidation, DiscountService};
pub use usage::{RecordSummary, UsageRecorder};

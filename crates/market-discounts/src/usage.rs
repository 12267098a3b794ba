//! # Post-Order Usage Recording
//!
//! After an order is placed and charged, each applied discount becomes a
//! usage row and a counter bump. Recording runs on the other side of
//! payment: the customer has already been charged, so nothing here may
//! abort the order.
//!
//! ## Failure Posture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  applied discount ──► conditional write ──► Recorded                │
//! │                             │                                       │
//! │                             ├──► CapExceeded  (logged, order keeps  │
//! │                             │                  its discount)        │
//! │                             └──► write error  (logged for          │
//! │                                                out-of-band retry)   │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The atomic conditional increment in [`UsageStore`] is what makes the
//! total cap exact under concurrent checkouts; a cap overshoot surfaces
//! here as `CapExceeded`, never as a double-counted row.

use tracing::{debug, error, warn};

use market_core::{AppliedDiscount, DiscountSource};

use crate::catalog::{UsageOutcome, UsageStore};

/// Tally of one recording pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordSummary {
    /// Usage rows written.
    pub recorded: usize,
    /// Writes refused because the total cap was already reached.
    pub cap_exceeded: usize,
    /// Writes that failed outright and need out-of-band reconciliation.
    pub failed: usize,
}

impl RecordSummary {
    /// True when every discount was recorded cleanly.
    pub fn is_clean(&self) -> bool {
        self.cap_exceeded == 0 && self.failed == 0
    }
}

/// Records applied discounts against an order.
pub struct UsageRecorder<S> {
    store: S,
}

impl<S: UsageStore> UsageRecorder<S> {
    /// Creates a recorder over the given store.
    pub fn new(store: S) -> Self {
        UsageRecorder { store }
    }

    /// Records one usage row per applied discount.
    ///
    /// Call exactly once per placed order, after payment. Never fails:
    /// every per-discount problem is logged and counted in the summary,
    /// and the order keeps the prices it was charged at.
    pub async fn record_order_discounts(
        &self,
        order_id: i64,
        user_id: i64,
        discounts: &[AppliedDiscount],
    ) -> RecordSummary {
        let mut summary = RecordSummary::default();

        for discount in discounts {
            let outcome = match discount.source {
                DiscountSource::Coupon => {
                    self.store
                        .record_coupon_use(discount.id, user_id, order_id)
                        .await
                }
                DiscountSource::Promotion => {
                    self.store
                        .record_promotion_use(discount.id, user_id, order_id)
                        .await
                }
            };

            match outcome {
                Ok(UsageOutcome::Recorded) => summary.recorded += 1,
                Ok(UsageOutcome::CapExceeded) => {
                    summary.cap_exceeded += 1;
                    warn!(
                        order_id,
                        discount_id = discount.id,
                        "Usage cap reached between validation and recording"
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        order_id,
                        discount_id = discount.id,
                        error = %err,
                        "Failed to record discount usage"
                    );
                }
            }
        }

        debug!(
            order_id,
            recorded = summary.recorded,
            cap_exceeded = summary.cap_exceeded,
            failed = summary.failed,
            "Recorded order discounts"
        );

        summary
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

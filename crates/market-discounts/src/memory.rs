//! # In-Memory Catalog
//!
//! A fixture implementation of [`CatalogReader`] and [`UsageStore`] backed
//! by a mutex. Serves the crate's own tests and any caller who wants to
//! exercise resolution without a real storage adapter.
//!
//! Clones share state, so a test can keep one handle for seeding and
//! asserting while the service owns another. The `fail_reads` and
//! `fail_writes` switches simulate a broken backend for the degradation
//! paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::{
    ApplicationType, CatalogReader, CouponRecord, PromotionOffer, PromotionRecord, UsageOutcome,
    UsageStore,
};
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Default)]
struct Inner {
    coupons: Vec<CouponRecord>,
    promotions: Vec<PromotionRecord>,
    /// Offers keyed by the product they cover.
    offers: Vec<(i64, i64, PromotionOffer)>,
    /// (coupon_id, user_id, order_id) rows.
    coupon_uses: Vec<(i64, i64, i64)>,
    /// (promotion_id, user_id, order_id) rows.
    promotion_uses: Vec<(i64, i64, i64)>,
    fee_structures: HashMap<i64, String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Shared-state in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seeds a coupon.
    pub fn add_coupon(&self, record: CouponRecord) {
        self.lock().coupons.push(record);
    }

    /// Seeds a promotion record (the usage-counter side of a campaign).
    pub fn add_promotion(&self, record: PromotionRecord) {
        self.lock().promotions.push(record);
    }

    /// Seeds a promotion offer covering one product.
    pub fn add_offer(&self, product_id: i64, vendor_id: i64, offer: PromotionOffer) {
        self.lock().offers.push((product_id, vendor_id, offer));
    }

    /// Seeds a vendor's raw fee-structure blob.
    pub fn set_fee_structure(&self, vendor_id: i64, raw: impl Into<String>) {
        self.lock().fee_structures.insert(vendor_id, raw.into());
    }

    /// Makes every read fail with [`CatalogError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Makes every write fail with [`CatalogError::QueryFailed`].
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn read_guard(inner: &Inner) -> CatalogResult<()> {
        if inner.fail_reads {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn active_auto_apply_coupons(
        &self,
        now: DateTime<Utc>,
    ) -> CatalogResult<Vec<CouponRecord>> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        Ok(inner
            .coupons
            .iter()
            .filter(|c| c.is_active && c.application == ApplicationType::AutoApply && c.in_window(now))
            .cloned()
            .collect())
    }

    async fn coupon_by_code(&self, code: &str) -> CatalogResult<Option<CouponRecord>> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        Ok(inner.coupons.iter().find(|c| c.code == code).cloned())
    }

    async fn user_coupon_usage(&self, coupon_id: i64, user_id: i64) -> CatalogResult<u32> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        Ok(inner
            .coupon_uses
            .iter()
            .filter(|(c, u, _)| *c == coupon_id && *u == user_id)
            .count() as u32)
    }

    async fn promotions_for_product(
        &self,
        product_id: i64,
        vendor_id: i64,
    ) -> CatalogResult<Vec<PromotionOffer>> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        // Refresh each offer's usage counter from the registered promotion
        // so recorded redemptions are visible on the next read.
        Ok(inner
            .offers
            .iter()
            .filter(|(p, v, _)| *p == product_id && *v == vendor_id)
            .map(|(_, _, offer)| {
                let mut offer = offer.clone();
                if let Some(current) = inner
                    .promotions
                    .iter()
                    .find(|p| p.id == offer.promotion.id)
                {
                    offer.promotion.usage = current.usage;
                }
                offer
            })
            .collect())
    }

    async fn user_promotion_usage(&self, promotion_id: i64, user_id: i64) -> CatalogResult<u32> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        Ok(inner
            .promotion_uses
            .iter()
            .filter(|(p, u, _)| *p == promotion_id && *u == user_id)
            .count() as u32)
    }

    async fn vendor_fee_structure(&self, vendor_id: i64) -> CatalogResult<Option<String>> {
        let inner = self.lock();
        Self::read_guard(&inner)?;

        Ok(inner.fee_structures.get(&vendor_id).cloned())
    }
}

#[async_trait]
impl UsageStore for MemoryCatalog {
    async fn record_coupon_use(
        &self,
        coupon_id: i64,
        user_id: i64,
        order_id: i64,
    ) -> CatalogResult<UsageOutcome> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(CatalogError::QueryFailed("write refused".to_string()));
        }

        // Conditional increment: row and counter move together, or not at
        // all once the total cap is reached.
        if let Some(record) = inner.coupons.iter_mut().find(|c| c.id == coupon_id) {
            if record.usage.total_exhausted() {
                return Ok(UsageOutcome::CapExceeded);
            }
            record.usage.total_used += 1;
        }
        inner.coupon_uses.push((coupon_id, user_id, order_id));

        Ok(UsageOutcome::Recorded)
    }

    async fn record_promotion_use(
        &self,
        promotion_id: i64,
        user_id: i64,
        order_id: i64,
    ) -> CatalogResult<UsageOutcome> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(CatalogError::QueryFailed("write refused".to_string()));
        }

        if let Some(record) = inner.promotions.iter_mut().find(|p| p.id == promotion_id) {
            if record.usage.total_exhausted() {
                return Ok(UsageOutcome::CapExceeded);
            }
            record.usage.total_used += 1;
        }
        inner.promotion_uses.push((promotion_id, user_id, order_id));

        Ok(UsageOutcome::Recorded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

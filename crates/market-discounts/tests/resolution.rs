//! End-to-end resolution scenarios over the in-memory catalog: gathering,
//! selection, the commission guard, cost allocation, and usage recording.

use chrono::{Duration, Utc};

use market_core::{
    AppliedDiscount, CartItem, CouponType, DiscountOutcome, DiscountValue, Money, Percent,
    PromotionSplit, UsageLimit,
};
use market_discounts::{
    ApplicationType, ApprovalStatus, CouponRecord, DiscountService, InvitationStatus,
    MemoryCatalog, PromotionOffer, PromotionRecord, PromotionStatus, PromotionTerms,
    UsageRecorder,
};

fn item(product_id: i64, vendor_id: i64, price_cents: i64) -> CartItem {
    CartItem {
        product_id,
        vendor_id,
        name: "Hand-thrown vase".to_string(),
        unit_price_cents: price_cents,
        quantity: 1,
    }
}

fn coupon(id: i64, code: &str, value: DiscountValue, coupon_type: CouponType) -> CouponRecord {
    CouponRecord {
        id,
        code: code.to_string(),
        name: format!("{code} offer"),
        description: None,
        value,
        coupon_type,
        application: ApplicationType::CouponCode,
        created_by_vendor: match coupon_type {
            CouponType::VendorCoupon => Some(10),
            _ => None,
        },
        is_active: true,
        valid_from: Utc::now() - Duration::days(1),
        valid_until: None,
        usage: UsageLimit::unlimited(),
        product_scope: Vec::new(),
    }
}

fn site_sale(id: i64, bps: u32) -> CouponRecord {
    let mut record = coupon(
        id,
        &format!("SALE{id}"),
        DiscountValue::Percentage(Percent::from_bps(bps)),
        CouponType::SiteSale,
    );
    record.application = ApplicationType::AutoApply;
    record
}

fn promotion_offer(id: i64, discount_bps: u32, admin_bps: u32, vendor_bps: u32) -> PromotionOffer {
    PromotionOffer {
        promotion: PromotionRecord {
            id,
            name: "Seasonal push".to_string(),
            code: Some("SEASON".to_string()),
            status: PromotionStatus::Active,
            valid_from: Utc::now() - Duration::days(1),
            valid_until: Some(Utc::now() + Duration::days(30)),
            usage: UsageLimit::unlimited(),
        },
        terms: PromotionTerms {
            customer_discount: Percent::from_bps(discount_bps),
            split: PromotionSplit {
                admin_bps,
                vendor_bps,
            },
            approval: ApprovalStatus::Approved,
        },
        invitation: InvitationStatus::Accepted,
    }
}

// =============================================================================
// Commission Guard
// =============================================================================

/// $100 item, 15% commission, 15% site sale: the subsidy would wipe out the
/// commission entirely, so the item reverts to full price with a reason.
#[tokio::test]
async fn site_sale_breaching_commission_floor_is_vetoed() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(site_sale(1, 1500));
    catalog.set_fee_structure(10, r#"{"commission_percentage": 15}"#);
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &[])
        .await;

    assert!(results[0].is_excluded());
    assert_eq!(results[0].discounted_price, Money::from_cents(10_000));
    assert!(results[0].discount_amount.is_zero());
    match &results[0].outcome {
        DiscountOutcome::Excluded { reason } => {
            assert!(reason.contains("commission below 3%"));
        }
        other => panic!("expected an exclusion, got {other:?}"),
    }
}

/// A smaller site sale that leaves the commission at or above the floor
/// goes through, funded entirely by the platform.
#[tokio::test]
async fn safe_site_sale_applies_at_platform_cost() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(site_sale(1, 1000));
    catalog.set_fee_structure(10, r#"{"commission_percentage": 15}"#);
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &[])
        .await;

    let details = results[0].details().expect("discount should apply");
    assert_eq!(results[0].discount_amount, Money::from_cents(1000));
    assert_eq!(results[0].discounted_price, Money::from_cents(9000));
    assert_eq!(details.admin_cost, Money::from_cents(1000));
    assert_eq!(details.vendor_cost, Money::zero());
}

/// A malformed fee-structure blob means the commission rate cannot be
/// established, so the site sale is vetoed rather than guessed at.
#[tokio::test]
async fn malformed_fee_structure_vetoes_the_site_sale() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(site_sale(1, 500));
    catalog.set_fee_structure(10, "not json at all");
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &[])
        .await;

    assert!(results[0].is_excluded());
}

/// The guard only covers platform-funded site sales; a vendor coupon of the
/// same size spends the vendor's own money and skips the check entirely.
#[tokio::test]
async fn vendor_coupon_is_exempt_from_the_commission_floor() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(coupon(
        1,
        "VENDOR15",
        DiscountValue::Percentage(Percent::from_bps(1500)),
        CouponType::VendorCoupon,
    ));
    let service = DiscountService::new(catalog);

    let codes = vec!["VENDOR15".to_string()];
    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &codes)
        .await;

    let details = results[0].details().expect("discount should apply");
    assert_eq!(results[0].discounted_price, Money::from_cents(8500));
    assert_eq!(details.vendor_cost, Money::from_cents(1500));
    assert_eq!(details.admin_cost, Money::zero());
}

// =============================================================================
// Cost Allocation
// =============================================================================

/// A 20% promotion on a $100 item with a 70/30 split: the $20 discount
/// divides into exactly $14 platform and $6 vendor.
#[tokio::test]
async fn promotion_cost_splits_exactly_between_platform_and_vendor() {
    let catalog = MemoryCatalog::new();
    catalog.add_offer(1, 10, promotion_offer(9, 2000, 7000, 3000));
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &[])
        .await;

    let details = results[0].details().expect("promotion should apply");
    assert_eq!(results[0].discount_amount, Money::from_cents(2000));
    assert_eq!(details.admin_cost, Money::from_cents(1400));
    assert_eq!(details.vendor_cost, Money::from_cents(600));
    assert_eq!(
        details.admin_cost + details.vendor_cost,
        results[0].discount_amount
    );
}

/// Odd amounts must still split without losing or inventing a cent.
#[tokio::test]
async fn odd_promotion_amounts_split_without_rounding_drift() {
    let catalog = MemoryCatalog::new();
    // 15% of $6.66 line is $1.00 (rounded); 50/50 of odd cents must still sum.
    catalog.add_offer(1, 10, promotion_offer(9, 1500, 5000, 5000));
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 667)], 100, &[])
        .await;

    let details = results[0].details().expect("promotion should apply");
    assert_eq!(
        details.admin_cost + details.vendor_cost,
        results[0].discount_amount
    );
}

// =============================================================================
// Selection
// =============================================================================

/// A percentage candidate outranks a fixed amount even when the fixed
/// amount saves the customer more on this particular item.
#[tokio::test]
async fn percentage_outranks_fixed_amount() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(coupon(
        1,
        "PCT5",
        DiscountValue::Percentage(Percent::from_bps(500)),
        CouponType::VendorCoupon,
    ));
    catalog.add_coupon(coupon(
        2,
        "FLAT20",
        DiscountValue::FixedAmount(Money::from_cents(2000)),
        CouponType::VendorCoupon,
    ));
    let service = DiscountService::new(catalog);

    let codes = vec!["PCT5".to_string(), "FLAT20".to_string()];
    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &codes)
        .await;

    let details = results[0].details().expect("discount should apply");
    assert_eq!(details.code.as_deref(), Some("PCT5"));
    assert_eq!(results[0].discount_amount, Money::from_cents(500));
}

/// Resolving the same cart twice yields identical results: resolution is a
/// pure read with no hidden state.
#[tokio::test]
async fn resolution_is_repeatable() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(coupon(
        1,
        "TEN",
        DiscountValue::Percentage(Percent::from_bps(1000)),
        CouponType::VendorCoupon,
    ));
    let service = DiscountService::new(catalog);

    let codes = vec!["TEN".to_string()];
    let items = vec![item(1, 10, 10_000), item(2, 10, 5000)];

    let first = service.resolve_discounts(items.clone(), 100, &codes).await;
    let second = service.resolve_discounts(items, 100, &codes).await;

    assert_eq!(first, second);
}

// =============================================================================
// Per-Item Independence
// =============================================================================

/// A veto on one item never disturbs its neighbors: the vetoed item reverts
/// to full price while the rest of the cart keeps its discounts.
#[tokio::test]
async fn veto_on_one_item_leaves_the_rest_of_the_cart_alone() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(site_sale(1, 1500));
    // Vendor 10 runs a thin 5% commission: the sale breaches its floor.
    catalog.set_fee_structure(10, r#"{"commission_percentage": 5}"#);
    // Vendor 20 runs the default-rich 25%: plenty of room.
    catalog.set_fee_structure(20, r#"{"commission_percentage": 25}"#);
    let service = DiscountService::new(catalog);

    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000), item(2, 20, 10_000)], 100, &[])
        .await;

    assert!(results[0].is_excluded());
    assert!(results[1].discount_applied());
    assert_eq!(results[1].discounted_price, Money::from_cents(8500));
}

/// A dead catalog degrades every item to full price instead of erroring.
#[tokio::test]
async fn catalog_outage_degrades_to_full_price() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(coupon(
        1,
        "TEN",
        DiscountValue::Percentage(Percent::from_bps(1000)),
        CouponType::VendorCoupon,
    ));
    catalog.fail_reads(true);
    let service = DiscountService::new(catalog);

    let codes = vec!["TEN".to_string()];
    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &codes)
        .await;

    assert!(!results[0].discount_applied());
    assert!(!results[0].is_excluded());
    assert_eq!(results[0].discounted_price, Money::from_cents(10_000));
}

// =============================================================================
// Usage Recording
// =============================================================================

/// The full loop: resolve, place the order, record usage, and watch the
/// per-user cap close the coupon on the next resolution.
#[tokio::test]
async fn recorded_usage_feeds_back_into_resolution() {
    let catalog = MemoryCatalog::new();
    let mut record = coupon(
        1,
        "ONCE",
        DiscountValue::Percentage(Percent::from_bps(1000)),
        CouponType::VendorCoupon,
    );
    record.usage = UsageLimit {
        total_limit: None,
        per_user_limit: Some(1),
        total_used: 0,
    };
    catalog.add_coupon(record);

    let service = DiscountService::new(catalog.clone());
    let recorder = UsageRecorder::new(catalog);
    let codes = vec!["ONCE".to_string()];

    let before = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &codes)
        .await;
    assert!(before[0].discount_applied());

    let applied: Vec<AppliedDiscount> = before
        .iter()
        .filter_map(|r| r.details().map(AppliedDiscount::from))
        .collect();
    let summary = recorder.record_order_discounts(555, 100, &applied).await;
    assert_eq!(summary.recorded, 1);
    assert!(summary.is_clean());

    let after = service
        .resolve_discounts(vec![item(1, 10, 10_000)], 100, &codes)
        .await;
    assert!(!after[0].discount_applied());
}

/// Two orders race for the last slot of a capped coupon: exactly one row is
/// written, the other attempt reports the cap instead of double-counting.
#[tokio::test]
async fn total_cap_is_exact_at_recording_time() {
    let catalog = MemoryCatalog::new();
    let mut record = coupon(
        1,
        "LAST1",
        DiscountValue::Percentage(Percent::from_bps(1000)),
        CouponType::VendorCoupon,
    );
    record.usage = UsageLimit {
        total_limit: Some(1),
        per_user_limit: None,
        total_used: 0,
    };
    catalog.add_coupon(record);

    let recorder = UsageRecorder::new(catalog);
    let discount = [AppliedDiscount {
        id: 1,
        source: market_core::DiscountSource::Coupon,
    }];

    let first = recorder.record_order_discounts(555, 100, &discount).await;
    let second = recorder.record_order_discounts(556, 200, &discount).await;

    assert_eq!(first.recorded, 1);
    assert_eq!(second.recorded, 0);
    assert_eq!(second.cap_exceeded, 1);
}

// =============================================================================
// Serialized Shape
// =============================================================================

/// The orchestrator consumes results as JSON; the tagged outcome and the
/// discount_type/discount_value pair are part of that contract.
#[tokio::test]
async fn results_serialize_with_tagged_outcomes() {
    let catalog = MemoryCatalog::new();
    let mut record = coupon(
        1,
        "TEN",
        DiscountValue::Percentage(Percent::from_bps(1000)),
        CouponType::VendorCoupon,
    );
    record.product_scope = vec![market_discounts::ProductScope {
        product_id: 1,
        vendor_id: 10,
    }];
    catalog.add_coupon(record);
    let service = DiscountService::new(catalog);

    let codes = vec!["TEN".to_string()];
    let results = service
        .resolve_discounts(vec![item(1, 10, 10_000), item(2, 99, 5000)], 100, &codes)
        .await;

    let json = serde_json::to_value(&results).expect("results serialize");

    assert_eq!(json[0]["outcome"]["status"], "applied");
    assert_eq!(json[0]["outcome"]["details"]["discount_type"], "percentage");
    assert_eq!(json[0]["discount_amount"], 1000);
    assert_eq!(json[1]["outcome"]["status"], "no_discount");
}

// =============================================================================
// Public Coupon Validation
// =============================================================================

#[tokio::test]
async fn typed_in_code_reports_storefront_feedback() {
    let catalog = MemoryCatalog::new();
    catalog.add_coupon(coupon(
        1,
        "SPRING20",
        DiscountValue::Percentage(Percent::from_bps(2000)),
        CouponType::AdminCoupon,
    ));
    let service = DiscountService::new(catalog);

    let good = service
        .validate_coupon_code("SPRING20", 100, &[item(1, 10, 10_000)])
        .await;
    assert!(good.valid);
    assert_eq!(good.coupon.unwrap().code, "SPRING20");

    let bad = service.validate_coupon_code("TYPO", 100, &[]).await;
    assert!(!bad.valid);
    assert_eq!(bad.error.as_deref(), Some("Coupon code not found or inactive"));
}

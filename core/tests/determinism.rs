//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two stores, same seed, same requests.
//! They must produce byte-identical report documents.
//! Any divergence is a blocker — do not merge until fixed.

use chrono::NaiveDate;
use orderlens_core::config::SeedProfile;
use orderlens_core::engine::AnalyticsEngine;
use orderlens_core::period::Granularity;
use orderlens_core::request::{AnalyticsRequest, Scope};
use orderlens_core::seed;
use orderlens_core::store::OrderStore;

fn build_engine(seed_value: u64) -> AnalyticsEngine<OrderStore> {
    let store = OrderStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let profile = SeedProfile::default_demo();
    let anchor = NaiveDate::from_ymd_opt(2026, 6, 30).expect("anchor date");
    seed::seed_store(&store, &profile, seed_value, anchor).expect("seeding");
    AnalyticsEngine::new(store)
}

fn demo_request() -> AnalyticsRequest {
    let profile = SeedProfile::default_demo();
    let scope = Scope::Brand {
        brand_id: "demo".into(),
        branch_ids: profile.branches,
    };
    AnalyticsRequest::new(scope, "2026-06-30T12:00:00Z".parse().unwrap())
        .with_range("2026-06-01", "2026-06-30")
        .with_compare(true)
}

/// Every report the engine can produce, serialized into one document.
fn full_report_doc(engine: &AnalyticsEngine<OrderStore>) -> String {
    let request = demo_request();
    let profile = SeedProfile::default_demo();
    let stock = seed::stock_levels(&profile);

    let doc = serde_json::json!({
        "dashboard": engine.dashboard(&request, &stock).expect("dashboard"),
        "sales": engine.sales_report(&request).expect("sales"),
        "products": engine.product_report(&request, &stock).expect("products"),
        "orders": engine.order_report(&request).expect("orders"),
        "customers": engine.customer_report(&request).expect("customers"),
        "abc": engine.abc_report(&request).expect("abc"),
        "hourly": engine.hourly_report(&request).expect("hourly"),
        "basket": engine.basket_report(&request, 2).expect("basket"),
        "cohorts_week": engine.cohort_report(&request, Granularity::Week).expect("cohorts"),
        "cohorts_month": engine.cohort_report(&request, Granularity::Month).expect("cohorts"),
        "rfm": engine.rfm_report(&request).expect("rfm"),
    });
    serde_json::to_string_pretty(&doc).expect("serialize")
}

#[test]
fn same_seed_produces_identical_reports() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let engine_a = build_engine(SEED);
    let engine_b = build_engine(SEED);

    let doc_a = full_report_doc(&engine_a);
    let doc_b = full_report_doc(&engine_b);

    if doc_a != doc_b {
        let line = doc_a
            .lines()
            .zip(doc_b.lines())
            .position(|(a, b)| a != b)
            .unwrap_or(0);
        panic!("report documents diverged at line {line}");
    }
}

#[test]
fn rerunning_reports_on_one_store_is_idempotent() {
    let engine = build_engine(42);

    let first = full_report_doc(&engine);
    let second = full_report_doc(&engine);

    assert_eq!(
        first, second,
        "re-analyzing the same rows must not change any figure"
    );
}

#[test]
fn different_seeds_produce_different_reports() {
    let engine_a = build_engine(42);
    let engine_b = build_engine(99);

    // With different seeds the order volumes should diverge.
    // This test verifies that seed differences are actually observable.
    assert_ne!(
        full_report_doc(&engine_a),
        full_report_doc(&engine_b),
        "different seeds produced identical reports — the seed is not being used"
    );
}

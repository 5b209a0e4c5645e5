use orderlens_core::abc::{self, AbcGrade};
use orderlens_core::records::OrderItemRecord;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn item(product_id: &str, name: &str, qty: u64, price: f64) -> OrderItemRecord {
    OrderItemRecord {
        order_id: "o1".into(),
        product_id: product_id.into(),
        product_name: name.into(),
        quantity: qty,
        unit_price: price,
    }
}

/// One product, one unit, at the given price.
fn unit(product_id: &str, price: f64) -> OrderItemRecord {
    item(product_id, product_id, 1, price)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// A single product is the whole catalogue: grade A, 100% of revenue.
#[test]
fn single_product_is_grade_a_at_full_share() {
    let report = abc::classify(&[unit("p-espresso", 100.0)]);

    assert_eq!(report.items.len(), 1);
    let only = &report.items[0];
    assert_eq!(only.grade, AbcGrade::A);
    assert!((only.revenue_percentage - 100.0).abs() < 1e-9);
    assert!((only.cumulative_percentage - 100.0).abs() < 1e-9);

    assert_eq!(report.summary[0].count, 1, "A holds the product");
    assert_eq!(report.summary[1].count, 0);
    assert_eq!(report.summary[2].count, 0);
}

/// The top product gets grade A even when it alone crosses the 80% line.
#[test]
fn dominant_top_product_stays_grade_a() {
    let report = abc::classify(&[unit("p-big", 90.0), unit("p-small", 10.0)]);

    assert_eq!(report.items[0].grade, AbcGrade::A, "rank 1 is always A");
    assert_eq!(
        report.items[1].grade,
        AbcGrade::C,
        "cumulative 100% lands past the B cutoff"
    );
}

/// Grades split at 80% and 95% cumulative revenue, counting the item
/// itself.
#[test]
fn grades_follow_cumulative_cutoffs() {
    // Shares: 40, 40, 15, 4, 1 → cumulative 40, 80, 95, 99, 100.
    let report = abc::classify(&[
        unit("p-1", 40.0),
        unit("p-2", 40.0),
        unit("p-3", 15.0),
        unit("p-4", 4.0),
        unit("p-5", 1.0),
    ]);

    let grades: Vec<AbcGrade> = report.items.iter().map(|i| i.grade).collect();
    assert_eq!(
        grades,
        vec![AbcGrade::A, AbcGrade::A, AbcGrade::B, AbcGrade::C, AbcGrade::C],
        "cumulative 80 is still A, 95 is still B, beyond is C"
    );

    assert_eq!(report.summary[0].count, 2);
    assert_eq!(report.summary[1].count, 1);
    assert_eq!(report.summary[2].count, 2);
    assert!(
        (report.summary[0].revenue_percentage - 80.0).abs() < 1e-9,
        "A-grade revenue share, got {}",
        report.summary[0].revenue_percentage
    );
}

/// Cumulative share never decreases down the ranking and the last item
/// closes at 100%.
#[test]
fn cumulative_percentage_is_monotone_to_100() {
    let items: Vec<OrderItemRecord> = (0..12)
        .map(|i| unit(&format!("p-{i:02}"), (i + 1) as f64 * 3.0))
        .collect();

    let report = abc::classify(&items);

    let mut last = 0.0;
    for item in &report.items {
        assert!(
            item.cumulative_percentage >= last - 1e-9,
            "cumulative dropped from {last} to {}",
            item.cumulative_percentage
        );
        last = item.cumulative_percentage;
    }
    assert!(
        (last - 100.0).abs() < 1e-6,
        "last cumulative must be ~100, got {last}"
    );
}

/// Ranking is by revenue, not quantity, and merges lines per product.
#[test]
fn ranking_merges_lines_and_uses_revenue() {
    let report = abc::classify(&[
        item("p-cheap", "Cheap", 50, 1.0),
        item("p-dear", "Dear", 2, 40.0),
        item("p-cheap", "Cheap", 10, 1.0),
    ]);

    assert_eq!(report.items[0].product_id, "p-dear", "80 beats 60");
    assert_eq!(report.items[1].revenue, 60.0, "50 + 10 units at 1.0");
}

/// No items, or items with zero value, produce an empty report with the
/// fixed three-grade summary intact.
#[test]
fn zero_revenue_yields_empty_report() {
    let empty = abc::classify(&[]);
    assert!(empty.items.is_empty());
    assert_eq!(empty.summary.len(), 3, "A, B, C rows even when empty");
    assert!(empty.summary.iter().all(|g| g.count == 0));

    let worthless = abc::classify(&[unit("p-free", 0.0)]);
    assert!(
        worthless.items.is_empty(),
        "zero total revenue cannot be ranked"
    );
}
